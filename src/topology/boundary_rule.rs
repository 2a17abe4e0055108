/// Decides whether a point shared by `count` component boundaries is itself on
/// the boundary of the whole geometry.
///
/// Only line endpoints are counted; area boundaries are unaffected.
pub trait BoundaryNodeRule {
    fn is_in_boundary(&self, count: usize) -> bool;
}

/// The standard boundary node rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryRule {
    /// A point is on the boundary iff an odd number of endpoints meet there.
    #[default]
    Mod2,
    /// Every endpoint is on the boundary.
    EndPoint,
    /// Endpoints shared by more than one component are on the boundary.
    MultivalentEndPoint,
    /// Only unshared endpoints are on the boundary.
    MonovalentEndPoint,
}

impl BoundaryNodeRule for BoundaryRule {
    fn is_in_boundary(&self, count: usize) -> bool {
        match self {
            Self::Mod2 => count % 2 == 1,
            Self::EndPoint => count > 0,
            Self::MultivalentEndPoint => count > 1,
            Self::MonovalentEndPoint => count == 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table() {
        let counts = [0, 1, 2, 3];
        let table = |rule: BoundaryRule| counts.map(|c| rule.is_in_boundary(c));
        assert_eq!(table(BoundaryRule::Mod2), [false, true, false, true]);
        assert_eq!(table(BoundaryRule::EndPoint), [false, true, true, true]);
        assert_eq!(table(BoundaryRule::MultivalentEndPoint), [false, false, true, true]);
        assert_eq!(table(BoundaryRule::MonovalentEndPoint), [false, true, false, false]);
    }

    #[test]
    fn custom_rule_through_trait_object() {
        struct Never;
        impl BoundaryNodeRule for Never {
            fn is_in_boundary(&self, _count: usize) -> bool {
                false
            }
        }
        let rules: [&dyn BoundaryNodeRule; 2] = [&BoundaryRule::default(), &Never];
        assert!(rules[0].is_in_boundary(1));
        assert!(!rules[1].is_in_boundary(1));
    }
}
