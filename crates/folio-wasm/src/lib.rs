#![forbid(unsafe_code)]

//! WASM runner for the Folio portfolio runtime.
//!
//! This crate provides [`PortfolioRunner`], a `wasm-bindgen`-exported struct
//! that wraps `folio_web::PageSession` and exposes it to JavaScript for
//! host-driven execution. The host mirrors the page layout into the runner,
//! forwards window events, and performs the JSON-encoded commands it drains
//! after every call.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

#[cfg(test)]
mod tests {
    use folio_backend::GeometryQuery;
    use crate::runner_core::RunnerCore;
    use folio_core::SectionId;
    use folio_runtime::{RenderFault, Rendered};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    const LAYOUT: [(&str, f64, f64); 6] = [
        ("home", 0.0, 800.0),
        ("about", 800.0, 700.0),
        ("resume", 1500.0, 900.0),
        ("portfolio", 2400.0, 1200.0),
        ("testimonials", 3600.0, 600.0),
        ("cta", 4200.0, 400.0),
    ];

    fn commands(core: &mut RunnerCore) -> Vec<Value> {
        let json = core.take_commands_json();
        let value: Value = serde_json::from_str(&json).expect("commands json should parse");
        value.as_array().cloned().expect("commands should be an array")
    }

    fn mounted() -> RunnerCore {
        let mut core = RunnerCore::new(1280.0, 800.0);
        for (name, top, height) in LAYOUT {
            assert!(core.set_section(name, top, height, true));
        }
        core.set_document_height(4800.0);
        core.init();
        core.skip_loading();
        core.animation_frame();
        core.take_commands_json();
        core
    }

    #[test]
    fn init_emits_listeners_and_first_frame() {
        let mut core = RunnerCore::new(1280.0, 800.0);
        core.init();
        let ops: Vec<String> = commands(&mut core)
            .iter()
            .map(|c| c["op"].as_str().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(
            ops,
            vec!["listen", "listen", "observe_mutations", "request_frame"]
        );
        assert!(core.animation_frame());
        assert!(!core.animation_frame());
    }

    #[test]
    fn navigation_defers_scroll_to_host() {
        let mut core = mounted();
        assert!(core.navigate("#resume", true));
        let cmds = commands(&mut core);
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0]["op"], "scroll_to");
        assert_eq!(cmds[0]["top"], 1428.0);
        assert_eq!(cmds[0]["behavior"], "smooth");
        // Deferred: the mirror has not moved yet.
        assert_eq!(core.session().page().scroll_top(), 0.0);

        // Host animation passes through "about" while the override holds.
        core.scroll(900.0);
        core.animation_frame();
        assert_eq!(core.state().navigation.active_section, SectionId::Resume);
        core.scroll(1428.0);
        core.animation_frame();
        assert_eq!(core.state().navigation.active_section, SectionId::Resume);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut core = mounted();
        assert!(!core.navigate("blog", true));
        assert!(!core.set_section("blog", 0.0, 100.0, true));
        assert!(!core.set_section("home", f64::NAN, 100.0, true));
        assert!(!core.remove_section("blog"));
        assert!(commands(&mut core).is_empty());
    }

    #[test]
    fn advance_time_ignores_bad_input() {
        let mut core = mounted();
        let before = core.now_ms();
        core.advance_time_ms(f64::NAN);
        core.advance_time_ms(f64::INFINITY);
        core.advance_time_ms(-5.0);
        core.advance_time_ms(0.0);
        assert_eq!(core.now_ms(), before);
        core.advance_time_ms(16.0);
        assert_eq!(core.now_ms(), before + 16.0);
    }

    #[test]
    fn set_time_never_runs_backwards() {
        let mut core = mounted();
        core.set_time_ms(1000.0);
        assert_eq!(core.now_ms(), 1000.0);
        core.set_time_ms(500.0);
        core.set_time_ms(f64::NAN);
        assert_eq!(core.now_ms(), 1000.0);
    }

    #[test]
    fn next_deadline_tracks_preload_timers() {
        let mut core = RunnerCore::new(1280.0, 800.0);
        assert_eq!(core.next_deadline_ms(), None);
        core.init();
        // Image loads start 20ms after mount.
        assert_eq!(core.next_deadline_ms(), Some(20.0));
        core.advance_time_ms(5.0);
        assert_eq!(core.next_deadline_ms(), Some(15.0));
    }

    #[test]
    fn config_json_overrides_defaults() {
        let json = r#"{ "navigation": { "sticky_offset": 100.0 } }"#;
        let mut core = RunnerCore::from_config_json(1280.0, 800.0, json).expect("valid config");
        for (name, top, height) in LAYOUT {
            core.set_section(name, top, height, true);
        }
        core.init();
        core.skip_loading();
        core.take_commands_json();
        core.navigate("about", true);
        let cmds = commands(&mut core);
        assert_eq!(cmds[0]["top"], 700.0);
    }

    #[test]
    fn invalid_config_json_is_an_error() {
        assert!(RunnerCore::from_config_json(1280.0, 800.0, "{ nope").is_err());
        let negative = r#"{ "navigation": { "sticky_offset": -1.0 } }"#;
        assert!(RunnerCore::from_config_json(1280.0, 800.0, negative).is_err());
    }

    #[test]
    fn snapshot_reflects_menu_and_gallery() {
        let mut core = mounted();
        assert!(core.toggle_menu());
        assert!(core.gallery_open(1));
        assert!(core.gallery_key("ArrowRight"));
        assert!(!core.gallery_key("Enter"));
        let snap: Value = serde_json::from_str(&core.snapshot_json()).expect("snapshot json");
        assert_eq!(snap["mobile_menu_open"], true);
        assert_eq!(snap["body_scroll_locked"], true);
        assert_eq!(snap["gallery"]["lightbox"], 2);
        assert!(core.gallery_key("Escape"));
        assert!(!core.gallery_close());
        core.set_menu_open(false);
        let snap: Value = serde_json::from_str(&core.snapshot_json()).expect("snapshot json");
        assert_eq!(snap["mobile_menu_open"], false);
    }

    #[test]
    fn render_fault_trips_boundary() {
        let mut core = mounted();
        let ok = core.render_with(|state| Ok::<_, RenderFault>(state.loading));
        assert_eq!(ok, Rendered::View(false));
        let bad = core.render_with(|_| Err::<(), _>(RenderFault::new("boom").within("Shell")));
        let Rendered::Fallback(panel) = bad else {
            panic!("expected fallback");
        };
        assert_eq!(panel.call_path, "    in Shell\n    in App");
        let again = core.render_with(|_| Ok::<_, RenderFault>(()));
        assert!(again.is_fallback());
    }

    #[test]
    fn unmount_stops_timers() {
        let mut core = RunnerCore::new(1280.0, 800.0);
        core.init();
        core.take_commands_json();
        core.unmount();
        assert_eq!(core.next_deadline_ms(), None);
        let ops: Vec<Value> = commands(&mut core);
        assert!(ops.iter().any(|c| c["op"] == "disconnect_mutations"));
        core.mutation();
        assert!(!core.animation_frame());
    }
}
