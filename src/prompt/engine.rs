use tera::Tera;

/// Tera-backed template engine for building the drafting prompt.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Start with no templates registered; callers add their own inline.
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string. Re-registering a name replaces it.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), tera::Error> {
        self.tera.add_raw_template(name, content)
    }

    /// Render a registered template against `context`.
    pub fn render(&self, name: &str, context: &tera::Context) -> Result<String, tera::Error> {
        self.tera.render(name, context)
    }
}
