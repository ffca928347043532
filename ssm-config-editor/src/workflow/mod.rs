//! Interactive edit and create loops.
//!
//! Both loops stage content in a [`ScratchBuffer`], hand it to an
//! [`InteractiveEditor`] and keep reopening the editor until the content
//! passes format validation or the [`RetryPrompt`] cancels. The store is only
//! written once valid content is available, and an edit that changes nothing
//! is never written.

pub mod scratch;

use std::{fmt, io, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    domain::{Parameter, ParameterName},
    editor::{EditorError, InteractiveEditor, RetryPrompt},
    format::{Format, FormatError, detect_format},
    storage::repository::{ParameterAdminRepository, PutParameterRequest, RepositoryError},
};

pub use scratch::ScratchBuffer;

const EDIT_PREFIX: &str = "ssm-edit-";
const CREATE_PREFIX: &str = "ssm-create-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed { version: i64 },
    /// The edited content matched the stored value; nothing was written.
    Unchanged,
}

#[derive(Debug)]
pub enum WorkflowError {
    Store(RepositoryError),
    Editor(EditorError),
    Io(io::Error),
    Cancelled,
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "parameter store error: {}", e),
            Self::Editor(e) => write!(f, "editor error: {}", e),
            Self::Io(e) => write!(f, "scratch file error: {}", e),
            Self::Cancelled => write!(f, "cancelled by user"),
        }
    }
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Editor(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}

impl From<RepositoryError> for WorkflowError {
    fn from(e: RepositoryError) -> Self {
        Self::Store(e)
    }
}

impl From<EditorError> for WorkflowError {
    fn from(e: EditorError) -> Self {
        Self::Editor(e)
    }
}

impl From<io::Error> for WorkflowError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub struct ParameterWorkflow {
    store: Arc<dyn ParameterAdminRepository>,
    editor: Arc<dyn InteractiveEditor>,
    prompt: Arc<dyn RetryPrompt>,
}

impl ParameterWorkflow {
    pub fn new(
        store: Arc<dyn ParameterAdminRepository>,
        editor: Arc<dyn InteractiveEditor>,
        prompt: Arc<dyn RetryPrompt>,
    ) -> Self {
        Self {
            store,
            editor,
            prompt,
        }
    }

    /// Edits an existing parameter in place.
    ///
    /// `format` defaults to the one detected from the current value. The
    /// parameter keeps its type and is overwritten only if the content changed.
    pub async fn edit_parameter(
        &self,
        name: &ParameterName,
        format: Option<Format>,
    ) -> Result<Outcome, WorkflowError> {
        let original = self.store.get(name, true).await?;
        let format = format.unwrap_or_else(|| detected(&original));

        let buffer = ScratchBuffer::create(EDIT_PREFIX, original.value().as_bytes())?;
        let candidate = self.edit_until_valid(&buffer, format).await?;

        let outcome = if candidate == original.value() {
            info!(parameter = name.as_str(), "No changes detected");
            Outcome::Unchanged
        } else {
            let request =
                PutParameterRequest::overwrite(name.clone(), candidate, original.param_type());
            let version = self.store.put(request).await?;
            info!(parameter = name.as_str(), version, "Parameter updated");
            Outcome::Committed { version }
        };

        discard(buffer);
        Ok(outcome)
    }

    /// Creates a new parameter, optionally seeded from the value of `from`.
    ///
    /// Without an explicit `format` the seed's detected format is used; with no
    /// seed either, any content is accepted.
    pub async fn create_parameter(
        &self,
        name: &ParameterName,
        from: Option<&ParameterName>,
        format: Option<Format>,
    ) -> Result<Outcome, WorkflowError> {
        let seed = match from {
            Some(source) => Some(self.store.get(source, true).await?),
            None => None,
        };
        let format = match (format, &seed) {
            (Some(format), _) => format,
            (None, Some(seed)) => detected(seed),
            (None, None) => Format::Text,
        };

        let seed_value = seed.as_ref().map(|p| p.value()).unwrap_or_default();
        let buffer = ScratchBuffer::create(CREATE_PREFIX, seed_value.as_bytes())?;
        let content = self.edit_until_valid(&buffer, format).await?;

        let version = self
            .store
            .put(PutParameterRequest::create(name.clone(), content))
            .await?;
        info!(parameter = name.as_str(), version, "Parameter created");

        discard(buffer);
        Ok(Outcome::Committed { version })
    }

    async fn edit_until_valid(
        &self,
        buffer: &ScratchBuffer,
        format: Format,
    ) -> Result<String, WorkflowError> {
        let mut attempt = 1u32;
        loop {
            debug!(attempt, %format, "Opening scratch buffer in editor");
            self.editor.open(buffer.path()).await?;

            let content = buffer.read()?;
            match accept(content, format) {
                Ok(value) => return Ok(value),
                Err(error) => {
                    warn!(attempt, %format, "Edited content rejected: {}", error);
                    if !self.prompt.retry(&error).await {
                        return Err(WorkflowError::Cancelled);
                    }
                }
            }
            attempt += 1;
        }
    }
}

fn detected(parameter: &Parameter) -> Format {
    let format = detect_format(parameter.value().as_bytes());
    info!(parameter = parameter.name().as_str(), %format, "Detected format");
    format
}

fn accept(content: Vec<u8>, format: Format) -> Result<String, FormatError> {
    format.validate(&content)?;
    String::from_utf8(content).map_err(|e| FormatError::InvalidUtf8(e.to_string()))
}

fn discard(buffer: ScratchBuffer) {
    let path = buffer.path().to_path_buf();
    if let Err(e) = buffer.discard() {
        warn!(path = %path.display(), "Failed to remove scratch file: {}", e);
    }
}
