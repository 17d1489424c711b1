use std::path::PathBuf;

/// Where the run's targets come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetInput {
    /// A single target, written as the only line of the target list.
    Single(String),
    /// An existing target-list file, copied as-is.
    List(PathBuf),
}

impl TargetInput {
    /// Pick the input from the two optional CLI values.
    ///
    /// The single value wins when both are supplied. Returns `None` when
    /// neither is.
    pub fn from_args(single: Option<String>, list: Option<PathBuf>) -> Option<Self> {
        match (single, list) {
            (Some(value), _) => Some(Self::Single(value)),
            (None, Some(path)) => Some(Self::List(path)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        assert_eq!(TargetInput::from_args(None, None), None);
        assert_eq!(
            TargetInput::from_args(None, Some(PathBuf::from("urls.txt"))),
            Some(TargetInput::List(PathBuf::from("urls.txt")))
        );
        assert_eq!(
            TargetInput::from_args(
                Some("http://example.test".to_string()),
                Some(PathBuf::from("urls.txt"))
            ),
            Some(TargetInput::Single("http://example.test".to_string()))
        );
    }
}
