//! Source listing on a project page
//!
//! The page names a source file; the viewer shows a loading placeholder,
//! then the file text, or an error placeholder naming the path to check.

use thiserror::Error;

/// Why a listing could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Error: HTTP error! Status: {0}")]
    Status(u16),
    /// Request never completed; `name` is the thrown error's class, e.g.
    /// `TypeError`
    #[error("{name}: {message}")]
    Network { name: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeView {
    Loading { src: String },
    Loaded { src: String, text: String },
    Failed { src: String, error: FetchError },
}

impl CodeView {
    pub fn new(src: impl Into<String>) -> Self {
        CodeView::Loading { src: src.into() }
    }

    pub fn src(&self) -> &str {
        match self {
            CodeView::Loading { src } | CodeView::Loaded { src, .. } | CodeView::Failed { src, .. } => src,
        }
    }

    /// Settle with the fetch outcome. A view that already settled keeps its
    /// first outcome.
    pub fn finish(&mut self, outcome: Result<String, FetchError>) {
        let CodeView::Loading { src } = self else {
            log::warn!("code view for {} already settled", self.src());
            return;
        };
        let src = std::mem::take(src);
        *self = match outcome {
            Ok(text) => CodeView::Loaded { src, text },
            Err(error) => {
                log::warn!("failed to load {}: {}", src, error);
                CodeView::Failed { src, error }
            }
        };
    }

    /// Text to place in the code block
    pub fn text(&self) -> String {
        match self {
            CodeView::Loading { .. } => "Loading...".to_owned(),
            CodeView::Loaded { text, .. } => text.clone(),
            CodeView::Failed { src, error } => format!(
                "Error loading code file: {}\n\nPlease check the file path: {}",
                error, src
            ),
        }
    }
}

/// Map an HTTP status to the fetch outcome's error, if any
pub fn check_status(status: u16) -> Result<(), FetchError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(FetchError::Status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_text_is_shown_verbatim() {
        let mut view = CodeView::new("BinaryLights.ino");
        assert_eq!(view.text(), "Loading...");
        view.finish(Ok("void setup() {}\n".to_owned()));
        assert_eq!(view.text(), "void setup() {}\n");
    }

    #[test]
    fn test_http_failure_placeholder() {
        let mut view = CodeView::new("BinaryLights.ino");
        view.finish(check_status(404).map(|_| String::new()));
        assert_eq!(
            view.text(),
            "Error loading code file: Error: HTTP error! Status: 404\n\nPlease check the file path: BinaryLights.ino"
        );
    }

    #[test]
    fn test_network_failure_keeps_error_name() {
        let mut view = CodeView::new("BinaryLights.ino");
        view.finish(Err(FetchError::Network {
            name: "TypeError".into(),
            message: "Failed to fetch".into(),
        }));
        assert_eq!(
            view.text(),
            "Error loading code file: TypeError: Failed to fetch\n\nPlease check the file path: BinaryLights.ino"
        );
    }

    #[test]
    fn test_first_outcome_wins() {
        let mut view = CodeView::new("a.ino");
        view.finish(Err(FetchError::Network {
            name: "TypeError".into(),
            message: "offline".into(),
        }));
        view.finish(Ok("late".into()));
        assert!(matches!(view, CodeView::Failed { .. }));
        assert_eq!(view.src(), "a.ino");
    }

    #[test]
    fn test_status_ranges() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert_eq!(check_status(500), Err(FetchError::Status(500)));
    }
}
