//! # Notice queue
//!
//! Load functions run before the view that shows notices exists. Notices
//! pushed before [`NoticeQueue::view_ready`] are held in order and handed
//! to the sink once it is attached; later notices go straight through.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    /// The text contains markup links the view may render as such.
    pub allow_links: bool,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            allow_links: false,
        }
    }

    pub fn with_links(mut self) -> Self {
        self.allow_links = true;
        self
    }
}

/// Whatever displays notices (a toast host, a terminal, a test recorder).
pub trait NoticeSink: Send + Sync {
    fn show(&self, notice: Notice);
}

enum State {
    Waiting(Vec<Notice>),
    Ready(Arc<dyn NoticeSink>),
}

pub struct NoticeQueue {
    state: Mutex<State>,
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Waiting(Vec::new())),
        }
    }

    pub fn push(&self, notice: Notice) {
        let sink = match &mut *self.lock() {
            State::Waiting(pending) => {
                pending.push(notice);
                return;
            }
            State::Ready(sink) => sink.clone(),
        };
        // Shown outside the lock so a sink may push again.
        sink.show(notice);
    }

    /// Attaches the sink and flushes everything queued so far, oldest first.
    pub fn view_ready(&self, sink: Arc<dyn NoticeSink>) {
        let pending = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, State::Ready(sink.clone())) {
                State::Waiting(pending) => pending,
                State::Ready(_) => Vec::new(),
            }
        };
        for notice in pending {
            sink.show(notice);
        }
    }

    /// Number of notices waiting for the view.
    pub fn pending(&self) -> usize {
        match &*self.lock() {
            State::Waiting(pending) => pending.len(),
            State::Ready(_) => 0,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
