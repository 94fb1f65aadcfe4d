// Per-call frames that carry the context into `Serialize` impls.
//
// `Serialize::serialize` has no parameter for a caller context, so every
// dispatch pushes a frame on a thread-local stack. `serialize_args` reads the
// top frame to call `ToArgs::to_args` with the caller's context, and parks a
// failing producer's error there so the dispatcher can hand it back unchanged
// instead of the stringified copy serde forces through `Error::custom`.

use crate::{ArgsOptions, Context, Error};
use std::cell::RefCell;
use std::marker::PhantomData;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Producing tokens.
    Encode,
    /// Answering `omitempty`; producers must not run.
    Probe,
    /// Inside a sequence element, where self-describing values are rejected.
    Element,
}

struct Frame {
    ctx: Context,
    options: ArgsOptions,
    mode: Mode,
    stashed: Option<Error>,
}

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Pops its frame on drop. Not `Send`: frames belong to the thread that pushed them.
pub(crate) struct FrameGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| {
            frames.borrow_mut().pop();
        });
    }
}

pub(crate) fn enter(ctx: &Context, options: &ArgsOptions, mode: Mode) -> FrameGuard {
    FRAMES.with(|frames| {
        frames.borrow_mut().push(Frame {
            ctx: ctx.clone(),
            options: options.clone(),
            mode,
            stashed: None,
        });
    });
    FrameGuard {
        _not_send: PhantomData,
    }
}

/// Pushes an element frame that inherits the current context and options.
pub(crate) fn enter_element() -> FrameGuard {
    FRAMES.with(|frames| {
        let mut frames = frames.borrow_mut();
        let (ctx, options) = match frames.last() {
            Some(top) => (top.ctx.clone(), top.options.clone()),
            None => (Context::background(), ArgsOptions::default()),
        };
        frames.push(Frame {
            ctx,
            options,
            mode: Mode::Element,
            stashed: None,
        });
    });
    FrameGuard {
        _not_send: PhantomData,
    }
}

pub(crate) fn mode() -> Option<Mode> {
    FRAMES.with(|frames| frames.borrow().last().map(|frame| frame.mode))
}

pub(crate) fn context() -> Option<Context> {
    FRAMES.with(|frames| frames.borrow().last().map(|frame| frame.ctx.clone()))
}

pub(crate) fn options() -> Option<ArgsOptions> {
    FRAMES.with(|frames| frames.borrow().last().map(|frame| frame.options.clone()))
}

/// Parks `err` in the current frame and returns its message for `Error::custom`.
pub(crate) fn stash(err: Error) -> String {
    let message = err.to_string();
    FRAMES.with(|frames| {
        if let Some(frame) = frames.borrow_mut().last_mut() {
            frame.stashed = Some(err);
        }
    });
    message
}

pub(crate) fn take_stashed() -> Option<Error> {
    FRAMES.with(|frames| {
        frames
            .borrow_mut()
            .last_mut()
            .and_then(|frame| frame.stashed.take())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_nest_and_unwind() {
        assert_eq!(mode(), None);
        let ctx = Context::background();
        let options = ArgsOptions::default();
        {
            let _outer = enter(&ctx, &options, Mode::Encode);
            assert_eq!(mode(), Some(Mode::Encode));
            {
                let _inner = enter(&ctx, &options, Mode::Probe);
                assert_eq!(mode(), Some(Mode::Probe));
            }
            assert_eq!(mode(), Some(Mode::Encode));
        }
        assert_eq!(mode(), None);
        assert!(context().is_none());
    }

    #[test]
    fn test_stash_is_per_frame() {
        let ctx = Context::background();
        let options = ArgsOptions::new().with_join_separator(";");
        let _frame = enter(&ctx, &options, Mode::Encode);
        assert_eq!(options_or_default().join_separator, ";");

        assert_eq!(stash(Error::Cancelled), "context cancelled");
        assert!(matches!(take_stashed(), Some(Error::Cancelled)));
        assert!(take_stashed().is_none());
    }

    #[test]
    fn test_stash_without_frame_only_formats() {
        assert_eq!(stash(Error::custom("lost")), "lost");
        assert!(take_stashed().is_none());
    }

    #[test]
    fn test_element_frame_inherits_options() {
        let ctx = Context::background();
        let options = ArgsOptions::new().with_concat_separator("+");
        let _frame = enter(&ctx, &options, Mode::Encode);
        {
            let _element = enter_element();
            assert_eq!(mode(), Some(Mode::Element));
            assert_eq!(options_or_default().concat_separator, "+");
        }
        assert_eq!(mode(), Some(Mode::Encode));
    }

    fn options_or_default() -> ArgsOptions {
        options().unwrap_or_default()
    }
}
