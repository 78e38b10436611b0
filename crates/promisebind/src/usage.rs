#![forbid(unsafe_code)]

//! Decorator application arguments and the call-shape check.

/// A method slot: what a decorator receives and returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor<M> {
    /// The method implementation, if the slot holds one.
    pub value: Option<M>,
}

impl<M> MethodDescriptor<M> {
    #[must_use]
    pub fn new(method: M) -> Self {
        Self {
            value: Some(method),
        }
    }

    /// A slot without a method (an accessor or plain field).
    #[must_use]
    pub fn empty() -> Self {
        Self { value: None }
    }
}

/// One argument of a decorator application.
#[derive(Debug)]
pub enum DecoratorArg<'a, H: ?Sized, M> {
    /// The object the method is defined on.
    Target(&'a H),
    /// A textual value, the method name in a decorator call.
    Name(&'a str),
    /// An object carrying an optional `value` member.
    Descriptor(MethodDescriptor<M>),
    /// Anything else (numbers, nulls, closures passed by mistake).
    Other,
}

/// Whether `args` has the `(target, name, descriptor)` decorator shape.
///
/// True iff there are exactly three arguments, the second is textual and the
/// third is a descriptor holding a `value`. The first argument is not
/// inspected.
#[must_use]
pub fn looks_like_decorator_call<H: ?Sized, M>(args: &[DecoratorArg<'_, H, M>]) -> bool {
    matches!(
        args,
        [
            _,
            DecoratorArg::Name(_),
            DecoratorArg::Descriptor(MethodDescriptor { value: Some(_) })
        ]
    )
}
