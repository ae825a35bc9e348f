//! Run an async operation under a spinner.

use std::future::Future;

use futures::future::BoxFuture;

use crate::error::Error;
use crate::options::Options;
use crate::spinner::Spinner;

/// The operation to await.
pub enum Action<T, E> {
    /// A future that is already built.
    Pending(BoxFuture<'static, Result<T, E>>),
    /// Build the future from the running spinner, so the operation can
    /// update its text or stop it early.
    WithSpinner(Box<dyn FnOnce(Spinner) -> BoxFuture<'static, Result<T, E>> + Send>),
}

impl<T, E> Action<T, E> {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }

    pub fn with_spinner<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Spinner) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::WithSpinner(Box::new(move |spinner| Box::pin(f(spinner))))
    }
}

/// Final text for the persisted line: fixed, or derived from the outcome.
pub enum Message<V> {
    Literal(String),
    With(Box<dyn FnOnce(&V) -> String + Send>),
}

impl<V> Message<V> {
    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(&V) -> String + Send + 'static,
    {
        Self::With(Box::new(f))
    }

    fn render(self, value: &V) -> String {
        match self {
            Self::Literal(text) => text,
            Self::With(f) => f(value),
        }
    }
}

impl<V> From<&str> for Message<V> {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl<V> From<String> for Message<V> {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

pub struct PromiseOptions<T, E> {
    pub spinner: Options,
    /// Replaces the spinner text on success.
    pub success_text: Option<Message<T>>,
    /// Replaces the spinner text on failure.
    pub fail_text: Option<Message<E>>,
}

impl<T, E> Default for PromiseOptions<T, E> {
    fn default() -> Self {
        Self {
            spinner: Options::default(),
            success_text: None,
            fail_text: None,
        }
    }
}

impl<T, E> From<&str> for PromiseOptions<T, E> {
    fn from(text: &str) -> Self {
        Self {
            spinner: Options::from(text),
            ..Self::default()
        }
    }
}

impl<T, E> From<Options> for PromiseOptions<T, E> {
    fn from(spinner: Options) -> Self {
        Self {
            spinner,
            ..Self::default()
        }
    }
}

/// Spin while `action` runs, then persist a success or failure line.
///
/// The action's own error is handed back unchanged. Configuration errors
/// from building the spinner are converted into `E` before anything runs.
///
/// ```no_run
/// use twirl::promise::{Action, promise};
///
/// # async fn run() -> anyhow::Result<()> {
/// let body = promise(
///     Action::pending(async { Ok::<_, anyhow::Error>("unicorns".to_string()) }),
///     "Fetching",
/// )
/// .await?;
/// # let _ = body;
/// # Ok(())
/// # }
/// ```
pub async fn promise<T, E>(action: Action<T, E>, options: impl Into<PromiseOptions<T, E>>) -> Result<T, E>
where
    E: From<Error>,
{
    let PromiseOptions {
        spinner: spinner_options,
        success_text,
        fail_text,
    } = options.into();

    let spinner = Spinner::new(spinner_options)?;
    spinner.start();

    let future = match action {
        Action::Pending(future) => future,
        Action::WithSpinner(build) => build(spinner.clone()),
    };

    match future.await {
        Ok(value) => {
            match success_text {
                Some(message) => spinner.succeed_with(message.render(&value)),
                None => spinner.succeed(),
            };
            Ok(value)
        }
        Err(err) => {
            match fail_text {
                Some(message) => spinner.fail_with(message.render(&err)),
                None => spinner.fail(),
            };
            Err(err)
        }
    }
}
