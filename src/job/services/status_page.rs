//! Client-facing status page rendering.

use minijinja::{Environment, value::Value};
use thiserror::Error;

use super::tracking::StatusView;

/// Template name within the environment. The `.html` suffix switches on
/// minijinja's HTML auto-escaping for interpolated record fields.
const TEMPLATE_NAME: &str = "status_page.html";

/// The status page: per job, the record fields, a progress ribbon over the
/// fixed stage sequence, the friendly stage message, and the QR image when
/// a fetchable reference exists. Stage circles use the shop's established
/// colors: green for passed stages, amber for the current one, grey for the
/// rest.
const STATUS_PAGE_TEMPLATE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Track Your Print Job</title></head>
<body>
{% for job in jobs %}
<section class="job">
  <h1>Print Job {{ job.job_id }}</h1>
  <p><strong>Client:</strong> {{ job.client_name }}</p>
  <p><strong>File:</strong> {{ job.file_name }}</p>
  <p><strong>Created:</strong> {{ job.created_at }}</p>
  <h2>Status: {{ job.current_stage }}</h2>
  <div class="stages">
    {% for stage in job.stages %}
    <div class="stage stage-{{ stage.progress }}">
      <div class="dot" style="background:{% if stage.progress == 'done' %}#4CAF50{% elif stage.progress == 'active' %}#f7c843{% else %}#d3d3d3{% endif %}"></div>
      <div class="label">{{ stage.label }}</div>
    </div>
    {% endfor %}
  </div>
  <p class="message">{{ job.message }}</p>
  {% if job.qr_image_url %}
  <h2>QR Code</h2>
  <img class="qr" src="{{ job.qr_image_url }}" alt="tracking QR code" width="220">
  {% endif %}
</section>
{% endfor %}
</body>
</html>
"#;

/// Errors returned while rendering the status page.
#[derive(Debug, Clone, Error)]
pub enum StatusPageError {
    /// The embedded template failed to compile or render.
    #[error("status page template error: {0}")]
    Template(String),
}

impl From<minijinja::Error> for StatusPageError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

/// Renders [`StatusView`] values to HTML.
#[derive(Debug)]
pub struct StatusPageRenderer {
    environment: Environment<'static>,
}

impl StatusPageRenderer {
    /// Builds a renderer with the embedded template compiled.
    ///
    /// # Errors
    ///
    /// Returns [`StatusPageError::Template`] when the template does not
    /// compile, which indicates a build defect rather than runtime state.
    pub fn new() -> Result<Self, StatusPageError> {
        let mut environment = Environment::new();
        environment.add_template(TEMPLATE_NAME, STATUS_PAGE_TEMPLATE)?;
        Ok(Self { environment })
    }

    /// Renders the page for one lookup result.
    ///
    /// # Errors
    ///
    /// Returns [`StatusPageError::Template`] when rendering fails.
    pub fn render(&self, view: &StatusView) -> Result<String, StatusPageError> {
        let template = self.environment.get_template(TEMPLATE_NAME)?;
        Ok(template.render(Value::from_serialize(view))?)
    }
}
