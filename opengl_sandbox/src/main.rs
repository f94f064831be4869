//! Interactive OpenGL demo scenes, picked at runtime from an imgui menu.
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    clippy::branches_sharing_code,
    clippy::map_unwrap_or,
    clippy::match_wildcard_for_single_variants,
    clippy::must_use_candidate,
    clippy::needless_for_each,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::unreadable_literal,
    clippy::unwrap_used,
    clippy::expect_used,
    deprecated_in_future,
    ellipsis_inclusive_range_patterns,
    future_incompatible,
    missing_copy_implementations,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2018_idioms,
    rust_2021_compatibility,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused,
    variant_size_differences
)]

use anyhow::Result;
use sandbox_engine::prelude::*;

mod trace;

const APPLICATION_NAME: &str = "OpenGL Sandbox";
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 960;

#[derive(Default, Debug)]
struct Application {
    test_menu: Option<TestMenu>,
}

impl OnUpdate for Application {
    fn on_start(&mut self, cx: &mut Context) -> sandbox_engine::Result<()> {
        tracing::info!("registering demo scenes");
        let mut test_menu = TestMenu::new(cx.gl());
        tests::register(&mut test_menu);
        self.test_menu = Some(test_menu);
        Ok(())
    }

    fn on_update(&mut self, cx: &mut Context, ui: &mut Ui) -> sandbox_engine::Result<()> {
        let renderer = cx.renderer();
        renderer.set_clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0))?;
        renderer.clear()?;

        let Some(test_menu) = &mut self.test_menu else {
            return Ok(());
        };
        test_menu.on_update(cx.delta_time());
        test_menu.on_render(renderer)?;

        let mut result = Ok(());
        ui.window("Test").build(|| {
            result = test_menu.on_imgui_render(ui);
            let framerate = ui.io().framerate;
            ui.text(format!(
                "Application average {:.3} ms/frame ({framerate:.1} FPS)",
                1000.0 / framerate
            ));
        });
        result
    }

    fn on_stop(&mut self, _cx: &mut Context) {
        tracing::info!("stopping demo scenes");
        if let Some(test_menu) = &mut self.test_menu {
            test_menu.return_to_menu();
        }
    }
}

fn main() -> Result<()> {
    let _trace = trace::initialize();

    let engine = Engine::builder()
        .title(APPLICATION_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .config(Config::new())
        .build();
    engine.run(Application::default())?;

    Ok(())
}
