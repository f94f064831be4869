//! Runtime switchable demo scenes.

use crate::{gl::Gl, imgui::Ui, renderer::Renderer, Error, Result};
use std::{fmt, rc::Rc};

/// A demo scene. Constructed when selected and dropped when the user goes back to the menu.
pub trait Test {
    /// Called every frame with the seconds elapsed since the previous frame.
    fn on_update(&mut self, _delta_time: f32) {}

    /// Called every frame after [`Test::on_update`].
    fn on_render(&mut self, _renderer: &Renderer) -> Result<()> {
        Ok(())
    }

    /// Called every frame while the menu window is being built.
    fn on_imgui_render(&mut self, _ui: &Ui) {}
}

type Factory = Box<dyn Fn(&Rc<Gl>) -> Result<Box<dyn Test>>>;

enum Current {
    Menu,
    Test { name: String, instance: Box<dyn Test> },
}

/// Registered tests and the one currently running, if any.
#[must_use]
pub struct TestMenu {
    gl: Rc<Gl>,
    tests: Vec<(String, Factory)>,
    current: Current,
}

impl fmt::Debug for TestMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMenu")
            .field("tests", &self.names().collect::<Vec<_>>())
            .field("current", &self.current_name())
            .finish_non_exhaustive()
    }
}

impl TestMenu {
    pub fn new(gl: &Rc<Gl>) -> Self {
        Self {
            gl: Rc::clone(gl),
            tests: Vec::new(),
            current: Current::Menu,
        }
    }

    /// Add a test to the menu. Tests are listed in registration order.
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        T: Test + 'static,
        F: Fn(&Rc<Gl>) -> Result<T> + 'static,
    {
        let name = name.into();
        tracing::debug!("registering test `{name}`");
        self.tests.push((
            name,
            Box::new(move |gl: &Rc<Gl>| -> Result<Box<dyn Test>> {
                Ok(Box::new(factory(gl)?))
            }),
        ));
        self
    }

    /// Construct the test registered as `name` and make it current, dropping the previous one.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let (name, factory) = self
            .tests
            .iter()
            .find(|(test, _)| test == name)
            .ok_or_else(|| Error::UnknownTest(name.to_owned()))?;
        tracing::info!("starting test `{name}`");
        let instance = factory(&self.gl)?;
        self.current = Current::Test {
            name: name.clone(),
            instance,
        };
        Ok(())
    }

    /// Drop the current test, if any, and show the menu.
    pub fn return_to_menu(&mut self) {
        if let Current::Test { name, .. } = &self.current {
            tracing::info!("stopping test `{name}`");
        }
        self.current = Current::Menu;
    }

    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        match &self.current {
            Current::Menu => None,
            Current::Test { name, .. } => Some(name),
        }
    }

    #[must_use]
    pub fn is_menu(&self) -> bool {
        matches!(self.current, Current::Menu)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|(name, _)| name.as_str())
    }

    pub fn on_update(&mut self, delta_time: f32) {
        if let Current::Test { instance, .. } = &mut self.current {
            instance.on_update(delta_time);
        }
    }

    pub fn on_render(&mut self, renderer: &Renderer) -> Result<()> {
        match &mut self.current {
            Current::Menu => Ok(()),
            Current::Test { instance, .. } => instance.on_render(renderer),
        }
    }

    /// Draw a back button and the current test's controls, or one button per test while on the
    /// menu. Clicks take effect immediately.
    pub fn on_imgui_render(&mut self, ui: &Ui) -> Result<()> {
        let mut clicked = None;
        match &mut self.current {
            Current::Menu => {
                for (name, _) in &self.tests {
                    if ui.button(name) {
                        clicked = Some(Some(name.clone()));
                    }
                }
            }
            Current::Test { instance, .. } => {
                if ui.button("<-") {
                    clicked = Some(None);
                } else {
                    instance.on_imgui_render(ui);
                }
            }
        }
        match clicked {
            Some(Some(name)) => self.select(&name),
            Some(None) => {
                self.return_to_menu();
                Ok(())
            }
            None => Ok(()),
        }
    }
}
