use serde::{Deserialize, Serialize};

/// Result slot for one remote read.
///
/// Reset to `Pending` at the start of every refresh and settled exactly once
/// per refresh by the read that owns it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Cell<T> {
    #[default]
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Cell<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Cell::Succeeded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Cell::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Cell::Pending)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Move to `Failed(msg)` only if nothing has settled yet.
    /// Returns true when the cell changed.
    pub fn fail_if_pending(&mut self, msg: &str) -> bool {
        if self.is_pending() {
            *self = Cell::Failed(msg.to_string());
            true
        } else {
            false
        }
    }
}

impl<T: Copy> Cell<T> {
    pub fn copied(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Cell<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Cell::Succeeded(v),
            Err(e) => Cell::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_if_pending_leaves_success() {
        let mut ok: Cell<u32> = Cell::Succeeded(7);
        assert!(!ok.fail_if_pending("boom"));
        assert_eq!(ok.value(), Some(&7));

        let mut pending: Cell<u32> = Cell::Pending;
        assert!(pending.fail_if_pending("boom"));
        assert_eq!(pending.error(), Some("boom"));
    }

    #[test]
    fn test_fail_if_pending_keeps_first_message() {
        let mut cell: Cell<u32> = Cell::Failed("first".into());
        assert!(!cell.fail_if_pending("second"));
        assert_eq!(cell.error(), Some("first"));
    }

    #[test]
    fn test_from_result() {
        let ok: Cell<u8> = Ok::<u8, String>(1).into();
        assert_eq!(ok, Cell::Succeeded(1));
        let err: Cell<u8> = Err::<u8, String>("down".into()).into();
        assert_eq!(err.error(), Some("down"));
        assert!(err.is_settled());
    }

    #[test]
    fn test_serialized_tag() {
        let json = serde_json::to_string(&Cell::Succeeded(1.5f64)).unwrap();
        assert_eq!(json, r#"{"state":"succeeded","value":1.5}"#);
        let json = serde_json::to_string(&Cell::<f64>::Pending).unwrap();
        assert_eq!(json, r#"{"state":"pending"}"#);
    }
}
