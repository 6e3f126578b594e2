// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Wrap the given value in `Ok`, or return `Ok(())` when called with no args.
///
/// ```
/// use r3bl_line_editor::ok;
/// fn it() -> miette::Result<u8> { ok!(1) }
/// fn unit() -> miette::Result<()> { ok!() }
/// # assert_eq!(it().unwrap(), 1);
/// # unit().unwrap();
/// ```
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}

/// Take the lock on a [`crate::StdMutex`] and panic with a uniform message if it is
/// poisoned. A poisoned lock means another thread panicked mid-update, which is a bug.
#[macro_export]
macro_rules! lock_or_panic {
    ($mutex:expr) => {
        $mutex.lock().unwrap_or_else(|it| {
            panic!("lock poisoned: {it}");
        })
    };
}
