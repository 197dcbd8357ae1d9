//! Binary and JSON persistence for [`PagingState`].

use crate::error::PagingError;
use crate::error::StateCodecError;

use super::PagingState;

impl PagingState {
    /// Encodes this state with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PagingError> {
        bincode::serialize(self).map_err(|e| StateCodecError::from(e).into())
    }

    /// Decodes and validates a state produced by [`PagingState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PagingError> {
        let state: PagingState = bincode::deserialize(bytes).map_err(StateCodecError::from)?;
        state.validated()
    }

    /// Encodes this state as JSON.
    pub fn to_json(&self) -> Result<String, PagingError> {
        serde_json::to_string(self).map_err(|e| StateCodecError::from(e).into())
    }

    /// Decodes and validates a state produced by [`PagingState::to_json`].
    pub fn from_json(json: &str) -> Result<Self, PagingError> {
        let state: PagingState = serde_json::from_str(json).map_err(StateCodecError::from)?;
        state.validated()
    }

    fn validated(self) -> Result<Self, PagingError> {
        self.check()
            .map_err(|e| StateCodecError::Invalid(e.to_string()))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Filters;

    fn sample_state() -> PagingState {
        let mut state = PagingState::new(25).unwrap();
        state.set_sort_column(Some("created".to_string()));
        state.set_sort_ascending(false);
        state.set_filters(Filters::from([("status".to_string(), "open".to_string())]));
        state.set_row_index(31);
        state.set_total_row_count(Some(480));
        state
    }

    #[test]
    fn test_bytes_restore_everything() {
        let state = sample_state();
        let bytes = state.to_bytes().unwrap();
        assert_eq!(PagingState::from_bytes(&bytes).unwrap(), state);
    }

    #[test]
    fn test_json_field_names() {
        let json = sample_state().to_json().unwrap();
        assert!(json.contains("\"page_size\":25"));
        assert!(json.contains("\"sort_column\":\"created\""));
        assert!(json.contains("\"total_row_count\":480"));
    }

    #[test]
    fn test_rejects_invalid_decoded_state() {
        let json = r#"{"row_index":-1,"page_size":0,"sort_column":null,"sort_ascending":true,"filters":{},"total_row_count":null}"#;
        assert!(matches!(
            PagingState::from_json(json),
            Err(PagingError::StateCodec(StateCodecError::Invalid(_)))
        ));

        let json = r#"{"row_index":-5,"page_size":10,"sort_column":null,"sort_ascending":true,"filters":{},"total_row_count":null}"#;
        assert!(PagingState::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            PagingState::from_bytes(&[1, 2]),
            Err(PagingError::StateCodec(StateCodecError::Binary(_)))
        ));
        assert!(matches!(
            PagingState::from_json("not json"),
            Err(PagingError::StateCodec(StateCodecError::Json(_)))
        ));
    }
}
