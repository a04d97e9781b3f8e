/// DOM mutation watching with an attempt budget and optional timeout
///
/// Every augmenter follows the same shape: look for a target now, then look
/// again after each batch of DOM mutations until it shows up or the policy
/// says to stop.
use crate::config::RetryPolicy;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{MutationObserver, MutationObserverInit, Node};

/// Result of one look for the watcher's target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    Found,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Attempt number, starting at 1
    Continue(u32),
    /// The budget is spent after this attempt
    Last(u32),
}

/// Counts mutation notifications against an optional maximum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptBudget {
    max_attempts: Option<u32>,
    attempts: u32,
}

impl AttemptBudget {
    pub fn new(max_attempts: Option<u32>) -> Self {
        AttemptBudget {
            max_attempts,
            attempts: 0,
        }
    }

    pub fn record(&mut self) -> Attempt {
        self.attempts = self.attempts.saturating_add(1);
        match self.max_attempts {
            Some(max) if self.attempts >= max => Attempt::Last(self.attempts),
            _ => Attempt::Continue(self.attempts),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// How a watch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEnd {
    Found { attempts: u32 },
    Exhausted { attempts: u32 },
    TimedOut { attempts: u32 },
}

struct WatchState {
    done: Cell<bool>,
    budget: RefCell<AttemptBudget>,
    observer: RefCell<Option<MutationObserver>>,
}

impl WatchState {
    /// Returns false when the watch had already finished
    fn finish(&self, end: WatchEnd, name: &str) -> bool {
        if self.done.replace(true) {
            return false;
        }
        if let Some(observer) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        match end {
            WatchEnd::Found { attempts } => {
                log::debug!("{}: target found after {} attempts", name, attempts)
            }
            WatchEnd::Exhausted { attempts } => {
                log::info!("{}: gave up after {} attempts", name, attempts)
            }
            WatchEnd::TimedOut { attempts } => {
                log::info!("{}: timed out after {} attempts", name, attempts)
            }
        }
        true
    }
}

/// A named subscription to DOM changes under one root node
pub struct DomWatcher {
    name: &'static str,
    policy: RetryPolicy,
}

impl DomWatcher {
    pub fn new(name: &'static str, policy: RetryPolicy) -> Self {
        DomWatcher { name, policy }
    }

    /// Run `check` now and after every mutation batch until it reports found
    ///
    /// `check` receives the attempt number; the immediate check is attempt 0
    /// and does not count against the budget.
    pub fn watch<F>(self, root: &Node, check: F) -> Result<(), String>
    where
        F: FnMut(u32) -> Watch + 'static,
    {
        let name = self.name;
        let check = Rc::new(RefCell::new(check));

        if (check.borrow_mut())(0) == Watch::Found {
            log::debug!("{}: target already present", name);
            return Ok(());
        }

        let state = Rc::new(WatchState {
            done: Cell::new(false),
            budget: RefCell::new(AttemptBudget::new(self.policy.max_attempts)),
            observer: RefCell::new(None),
        });

        let callback = {
            let state = state.clone();
            let check = check.clone();
            Closure::wrap(Box::new(move |_records: js_sys::Array, _observer: MutationObserver| {
                if state.done.get() {
                    return;
                }

                let attempt = state.budget.borrow_mut().record();
                let attempts = match attempt {
                    Attempt::Continue(n) | Attempt::Last(n) => n,
                };

                if (check.borrow_mut())(attempts) == Watch::Found {
                    state.finish(WatchEnd::Found { attempts }, name);
                } else if let Attempt::Last(_) = attempt {
                    state.finish(WatchEnd::Exhausted { attempts }, name);
                }
            }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>)
        };

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| format!("{}: failed to create observer: {:?}", name, e))?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);

        observer
            .observe_with_options(root, &options)
            .map_err(|e| format!("{}: failed to observe: {:?}", name, e))?;

        *state.observer.borrow_mut() = Some(observer);
        // The observer is disconnected once the watch ends, after which the
        // callback is never invoked again
        callback.forget();

        if let Some(timeout_ms) = self.policy.timeout_ms {
            let state = state.clone();
            schedule(timeout_ms, move || {
                let attempts = state.budget.borrow().attempts();
                state.finish(WatchEnd::TimedOut { attempts }, name);
            })?;
        }

        Ok(())
    }
}

/// Run `f` once after `delay_ms`
pub fn schedule<F>(delay_ms: u32, f: F) -> Result<i32, String>
where
    F: FnOnce() + 'static,
{
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let callback = Closure::once_into_js(f);

    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        )
        .map_err(|e| format!("Failed to schedule timer: {:?}", e))
}
