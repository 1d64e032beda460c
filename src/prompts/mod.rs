use crate::{Error, Result};
use minijinja::{Environment, context};
use std::path::Path;
use tracing::debug;

const SYSTEM_PROMPT_FILE: &str = "sommelier_system_prompt.txt";
const IMAGE_PROCESSING_PROMPT_FILE: &str = "image_processing_prompt.txt";
const USER_PROMPT_TEMPLATE_FILE: &str = "sommelier_user_prompt_template.txt";

const USER_PROMPT_TEMPLATE: &str = "sommelier_user_prompt";

/// Startup-loaded prompt configuration. Read-only once constructed, so it is
/// shared across requests behind an `Arc` without locking.
#[derive(Debug)]
pub struct PromptStore {
    sommelier_system_prompt: String,
    image_processing_prompt: String,
    templates: Environment<'static>,
}

impl PromptStore {
    /// Loads the three prompt files from the configured prompts directory.
    /// A missing or unreadable file is fatal: the process must not serve
    /// traffic without its prompts.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let system_prompt = read_prompt_file(dir, SYSTEM_PROMPT_FILE).await?;
        let image_processing_prompt = read_prompt_file(dir, IMAGE_PROCESSING_PROMPT_FILE).await?;
        let user_prompt_template = read_prompt_file(dir, USER_PROMPT_TEMPLATE_FILE).await?;

        debug!("Loaded prompt files from {}", dir.display());

        Self::from_parts(system_prompt, image_processing_prompt, &user_prompt_template)
    }

    /// Builds a store from in-memory strings. `load` delegates here; tests
    /// use it directly to avoid touching the filesystem.
    pub fn from_parts(
        sommelier_system_prompt: impl Into<String>,
        image_processing_prompt: impl Into<String>,
        user_prompt_template: &str,
    ) -> Result<Self> {
        let mut templates = Environment::new();
        templates.add_template_owned(
            USER_PROMPT_TEMPLATE.to_string(),
            user_prompt_template.to_string(),
        )?;

        Ok(Self {
            sommelier_system_prompt: sommelier_system_prompt.into(),
            image_processing_prompt: image_processing_prompt.into(),
            templates,
        })
    }

    pub fn sommelier_system_prompt(&self) -> &str {
        &self.sommelier_system_prompt
    }

    pub fn image_processing_prompt(&self) -> &str {
        &self.image_processing_prompt
    }

    /// Renders the user-facing prompt. The template drops its wine-list
    /// section when `wine_list` is `None` rather than failing.
    pub fn render_user_prompt(&self, user_prompt: &str, wine_list: Option<&str>) -> Result<String> {
        let template = self.templates.get_template(USER_PROMPT_TEMPLATE)?;
        let rendered = template.render(context! { user_prompt, wine_list })?;
        Ok(rendered)
    }
}

async fn read_prompt_file(dir: &Path, file: &str) -> Result<String> {
    let path = dir.join(file);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| Error::config(format!("Failed to read prompt file {}: {}", path.display(), e)))
}
