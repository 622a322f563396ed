// src/fetch.rs
//
// Screen-side wrapper for a remote read: tracks loading/error/result so the
// caller can render from one place. Failures are captured, never re-raised;
// check the returned value or `error()`.

use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::error::AppError;

type FetchOp<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, AppError>> + Send + Sync>;

pub struct FetchAdapter<T> {
    op: FetchOp<T>,
    data: Option<T>,
    error: Option<AppError>,
    loading: bool,
    auto_run: bool,
    activated: bool,
}

impl<T> FetchAdapter<T> {
    /// Adapter that fires on first `activate()`.
    pub fn new<F, Fut>(op: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        Self::build(op, true)
    }

    /// Adapter that only runs when the caller says so (search-as-you-type
    /// screens drive this themselves).
    pub fn manual<F, Fut>(op: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        Self::build(op, false)
    }

    fn build<F, Fut>(op: F, auto_run: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        Self {
            op: Box::new(move || op().boxed()),
            data: None,
            error: None,
            loading: false,
            auto_run,
            activated: false,
        }
    }

    /// Runs the operation once. On success the result is stored and returned;
    /// on failure the error is stored, the previous result is kept, and
    /// `None` comes back.
    pub async fn run(&mut self) -> Option<&T> {
        self.loading = true;
        self.error = None;

        let outcome = (self.op)().await;
        self.loading = false;

        match outcome {
            Ok(value) => {
                self.data = Some(value);
                self.data.as_ref()
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    /// First call runs the operation if the adapter was built with auto-run;
    /// every later call is a no-op.
    pub async fn activate(&mut self) {
        if self.activated {
            return;
        }
        self.activated = true;
        if self.auto_run {
            self.run().await;
        }
    }

    /// Back to the empty state without touching the operation.
    pub fn reset(&mut self) {
        self.data = None;
        self.error = None;
        self.loading = false;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
