use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thenable::runtime::value::NativeFunction;
use thenable::runtime::value::object::Object;
use thenable::{Context, Handler, Promise, PromiseError, PromiseState, Value};

/// A thenable whose `then` runs `body` with the resolve and reject arguments.
fn foreign_thenable<F>(body: F) -> Value
where
    F: Fn(&Value, &Value) -> Result<(), PromiseError> + 'static,
{
    Value::object([(
        "then",
        Value::function("then", move |_, args| {
            let resolve = args.first().cloned().unwrap_or(Value::Undefined);
            let reject = args.get(1).cloned().unwrap_or(Value::Undefined);
            body(&resolve, &reject)?;
            Ok(Value::Undefined)
        }),
    )])
}

fn invoke(function: &Value, argument: impl Into<Value>) -> Result<(), PromiseError> {
    function.call(&Value::Undefined, &[argument.into()])?;
    Ok(())
}

fn settled_from(ctx: &Context, value: Value) -> PromiseState {
    let p = ctx.resolve(0).then(Some(Handler::new(move |_| Ok(value.clone()))), None);
    ctx.settle(&p).expect("promise should settle")
}

fn nested_promises(ctx: &Context, depth: usize, leaf: Promise) -> Promise {
    (0..depth).fold(leaf, |inner, _| ctx.resolve(inner))
}

#[test]
fn nested_promises_unwrap_to_innermost_value() {
    for depth in 0..=5 {
        let ctx = Context::new();
        let p = nested_promises(&ctx, depth, ctx.resolve("leaf"));
        assert_eq!(
            ctx.settle(&p).unwrap(),
            PromiseState::Fulfilled(Value::from("leaf")),
            "depth {depth}"
        );
    }
}

#[test]
fn nested_promises_unwrap_to_innermost_reason() {
    for depth in 0..=5 {
        let ctx = Context::new();
        let p = nested_promises(&ctx, depth, ctx.reject("why"));
        assert_eq!(
            ctx.settle(&p).unwrap(),
            PromiseState::Rejected(Value::from("why")),
            "depth {depth}"
        );
    }
}

#[test]
fn nested_thenables_unwrap_to_innermost_value() {
    fn wrap(inner: Value) -> Value {
        foreign_thenable(move |resolve, _| invoke(resolve, inner.clone()))
    }

    for depth in 0..=5 {
        let ctx = Context::new();
        let value = (0..depth).fold(Value::from(11), |inner, _| wrap(inner));
        assert_eq!(
            settled_from(&ctx, value),
            PromiseState::Fulfilled(Value::from(11)),
            "depth {depth}"
        );
    }
}

#[test]
fn thenable_calling_both_capabilities_settles_once_with_the_first() {
    let ctx = Context::new();
    let value = foreign_thenable(|resolve, reject| {
        invoke(resolve, "first")?;
        invoke(reject, "second")
    });
    assert_eq!(settled_from(&ctx, value), PromiseState::Fulfilled(Value::from("first")));

    let value = foreign_thenable(|resolve, reject| {
        invoke(reject, "first")?;
        invoke(resolve, "second")
    });
    assert_eq!(settled_from(&ctx, value), PromiseState::Rejected(Value::from("first")));
}

#[test]
fn thenable_calling_resolve_twice_uses_the_first_value() {
    let ctx = Context::new();
    let never = ctx.deferred().promise;
    let value = foreign_thenable(move |resolve, _| {
        invoke(resolve, never.clone())?;
        invoke(resolve, "second")
    });
    let p = ctx.resolve(value);
    ctx.run_until_idle().unwrap();

    // Locked in to a promise that never settles.
    assert!(p.is_pending());
}

#[test]
fn thenable_throwing_after_resolving_is_ignored() {
    let ctx = Context::new();
    let value = foreign_thenable(|resolve, _| {
        invoke(resolve, "kept")?;
        Err(PromiseError::thrown("ignored"))
    });
    assert_eq!(settled_from(&ctx, value), PromiseState::Fulfilled(Value::from("kept")));
}

#[test]
fn thenable_throwing_before_settling_rejects() {
    let ctx = Context::new();
    let value = foreign_thenable(|_, _| Err(PromiseError::thrown("then failed")));
    assert_eq!(
        settled_from(&ctx, value),
        PromiseState::Rejected(Value::from("then failed"))
    );
}

#[test]
fn failing_then_getter_rejects() {
    let ctx = Context::new();
    let object = Object::new();
    object.set_getter("then", |_, _| Err(PromiseError::thrown("getter")));
    assert_eq!(
        settled_from(&ctx, Value::Object(Rc::new(object))),
        PromiseState::Rejected(Value::from("getter"))
    );
}

#[test]
fn thenable_settling_later_is_followed() {
    let ctx = Context::new();
    let stash: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
    let keep = Rc::clone(&stash);
    let value = foreign_thenable(move |resolve, _| {
        *keep.borrow_mut() = Some(resolve.clone());
        Ok(())
    });

    let p = ctx.resolve(value);
    ctx.run_until_idle().unwrap();
    assert!(p.is_pending());

    let resolve = stash.borrow_mut().take().expect("then was called");
    invoke(&resolve, 5).unwrap();
    invoke(&resolve, 6).unwrap();
    assert_eq!(ctx.settle(&p).unwrap(), PromiseState::Fulfilled(Value::from(5)));
}

#[test]
fn thenable_resolving_with_a_promise_adopts_it() {
    let ctx = Context::new();
    let d = ctx.deferred();
    let inner = d.promise.clone();
    let value = foreign_thenable(move |resolve, _| invoke(resolve, inner.clone()));

    let p = ctx.resolve(value);
    ctx.run_until_idle().unwrap();
    assert!(p.is_pending());

    d.reject.call("inner reason");
    assert_eq!(ctx.settle(&p).unwrap(), PromiseState::Rejected(Value::from("inner reason")));
}

#[test]
fn callable_objects_with_then_are_thenables() {
    let ctx = Context::new();
    let function = Rc::new(Object::function(NativeFunction::from_closure("f", |_, _| {
        Ok(Value::Undefined)
    })));
    function.set(
        "then",
        Value::function("then", |_, args| {
            args[0].call(&Value::Undefined, &[Value::from("from function")])
        }),
    );

    assert_eq!(
        settled_from(&ctx, Value::Object(function)),
        PromiseState::Fulfilled(Value::from("from function"))
    );
}

#[test]
fn then_property_is_read_once_per_resolution() {
    let ctx = Context::new();
    let reads = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reads);
    let object = Object::new();
    object.set_getter("then", move |_, _| {
        counter.set(counter.get() + 1);
        Ok(Value::Undefined)
    });
    let value = Value::Object(Rc::new(object));

    assert_eq!(settled_from(&ctx, value.clone()), PromiseState::Fulfilled(value));
    assert_eq!(reads.get(), 1);
}

#[test]
fn own_promises_work_as_foreign_thenables() {
    let ctx = Context::new();
    let source = ctx.resolve(21);
    let then = Value::Promise(source).get("then").unwrap();
    assert!(then.is_callable());

    let doubled = Value::function("double", |_, args| {
        Ok(Value::from(args[0].as_number().unwrap_or_default() * 2.0))
    });
    let derived = then.call(&Value::Undefined, &[doubled]).unwrap();
    let derived = derived.as_promise().expect("then returns a promise").clone();

    assert_eq!(ctx.settle(&derived).unwrap(), PromiseState::Fulfilled(Value::from(42)));
}
