use web_sys::{HtmlCanvasElement, HtmlInputElement, Window};

use kokuban_engine::BoardConfig;

/// Board settings plus client-only switches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientConfig {
    pub board: BoardConfig,
    pub debug: bool,
}

impl ClientConfig {
    /// Reads `?debug=1` from the page URL, the optional `data-config` JSON on
    /// the canvas, and the thickness slider's initial value. Install logging
    /// before calling this so a rejected `data-config` is reported.
    pub fn load(window: &Window, canvas: &HtmlCanvasElement, thickness: &HtmlInputElement) -> Self {
        Self::from_sources(
            &page_search(window),
            canvas.get_attribute("data-config").as_deref(),
            &thickness.value(),
        )
    }

    /// The slider only seeds the pen width when `data-config` leaves
    /// `penThickness` unset.
    pub fn from_sources(search: &str, data_config: Option<&str>, slider: &str) -> Self {
        let mut board = parse_board_config(data_config);
        if !sets_pen_thickness(data_config) {
            if let Some(value) = parse_thickness(slider) {
                board.pen_thickness = value;
            }
        }
        Self {
            board,
            debug: debug_enabled(search),
        }
    }
}

pub fn page_search(window: &Window) -> String {
    window.location().search().ok().unwrap_or_default()
}

pub fn debug_enabled(search: &str) -> bool {
    search.contains("debug=1")
        || search.contains("debug=true")
        || search.contains("log=1")
        || search.contains("log=true")
}

pub fn parse_board_config(raw: Option<&str>) -> BoardConfig {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return BoardConfig::default();
    };
    match serde_json::from_str(raw) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Ignoring invalid data-config: {err}");
            BoardConfig::default()
        }
    }
}

fn sets_pen_thickness(raw: Option<&str>) -> bool {
    raw.and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
        .is_some_and(|value| value.get("penThickness").is_some())
}

pub fn parse_thickness(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use kokuban_engine::ResizePolicy;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn debug_flag_comes_from_query_string() {
        assert!(debug_enabled("?debug=1"));
        assert!(debug_enabled("?foo=bar&log=true"));
        assert!(!debug_enabled(""));
        assert!(!debug_enabled("?debug=0"));
    }

    #[test]
    fn missing_or_blank_config_uses_defaults() {
        assert_eq!(parse_board_config(None), BoardConfig::default());
        assert_eq!(parse_board_config(Some("  ")), BoardConfig::default());
    }

    #[test]
    fn data_config_json_is_applied() {
        let config = parse_board_config(Some(
            r#"{"eraserThickness": 40, "resizePolicy": "preserve"}"#,
        ));
        assert_eq!(config.eraser_thickness, 40.0);
        assert_eq!(config.resize_policy, ResizePolicy::Preserve);
    }

    #[test]
    fn invalid_json_falls_back_to_defaults() {
        assert_eq!(parse_board_config(Some("{oops")), BoardConfig::default());
    }

    #[test]
    fn invalid_json_is_reported_as_a_warning() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .without_time()
            .with_max_level(tracing::Level::WARN)
            .finish();
        let config = tracing::subscriber::with_default(subscriber, || {
            ClientConfig::from_sources("", Some("{oops"), "6")
        });
        assert_eq!(config.board.eraser_thickness, BoardConfig::default().eraser_thickness);
        let logged = captured.text();
        assert!(logged.contains("WARN"), "{logged}");
        assert!(logged.contains("Ignoring invalid data-config"), "{logged}");
    }

    #[test]
    fn slider_seeds_pen_width_unless_config_sets_it() {
        let config = ClientConfig::from_sources("", None, "9");
        assert_eq!(config.board.pen_thickness, 9.0);

        let config = ClientConfig::from_sources("", Some(r#"{"eraserThickness": 30}"#), "9");
        assert_eq!(config.board.pen_thickness, 9.0);

        let config = ClientConfig::from_sources("?debug=1", Some(r#"{"penThickness": 3}"#), "9");
        assert_eq!(config.board.pen_thickness, 3.0);
        assert!(config.debug);
    }

    #[test]
    fn thickness_parsing_rejects_garbage() {
        assert_eq!(parse_thickness("6"), Some(6.0));
        assert_eq!(parse_thickness(" 12.5 "), Some(12.5));
        assert_eq!(parse_thickness(""), None);
        assert_eq!(parse_thickness("NaN"), None);
        assert_eq!(parse_thickness("wide"), None);
    }
}
