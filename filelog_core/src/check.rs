//! Fatal-condition reporting and the `check*!` macro family.
//!
//! A failed check builds a one-line diagnostic (`file:line` plus the source
//! text of the condition and, for binary checks, the operand values) and
//! hands it to an [`ErrorReporter`]. The reporter's handler is expected to
//! terminate the process; the default one prints to stderr and exits with
//! status 1.
//!
//! Two ways to reach a reporter:
//! - inject one explicitly (`ScopedFile::open_with`, `FileLogger::open_with`)
//! - use the process reporter, set up lazily with the default handler and
//!   replaceable through [`set_error_handler`].

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Exit status used for every fatal termination.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Tolerance used by `check_float_eq!`.
pub const FLOAT_EQ_EPSILON: f64 = 1e-5;

pub type ErrorHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Prints `Fatal Error: <msg>` and a blank line to stderr, then exits with status 1.
pub fn default_error_handler(error_msg: &str) {
    tracing::error!(error = error_msg, "fatal error");
    eprintln!("Fatal Error: {error_msg}\n");
    std::process::exit(FATAL_EXIT_CODE);
}

/// Owner of the handler invoked on fatal-condition violations.
#[derive(Clone)]
pub struct ErrorReporter {
    handler: ErrorHandler,
}

impl ErrorReporter {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Report a fatal error. Never returns: if the handler comes back, the
    /// process is terminated here.
    pub fn fatal(&self, error_msg: &str) -> ! {
        (self.handler)(error_msg);
        eprintln!("Error handler failure - exiting");
        std::process::exit(FATAL_EXIT_CODE);
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(default_error_handler)
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter").finish_non_exhaustive()
    }
}

static PROCESS_REPORTER: OnceLock<RwLock<ErrorReporter>> = OnceLock::new();

fn process_slot() -> &'static RwLock<ErrorReporter> {
    PROCESS_REPORTER.get_or_init(|| RwLock::new(ErrorReporter::default()))
}

/// Snapshot of the process reporter.
pub fn error_reporter() -> ErrorReporter {
    process_slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process reporter, returning the one previously installed.
pub fn set_error_reporter(reporter: ErrorReporter) -> ErrorReporter {
    let mut slot = process_slot()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, reporter)
}

/// Install a new process-wide handler, returning the previous reporter.
pub fn set_error_handler<F>(handler: F) -> ErrorReporter
where
    F: Fn(&str) + Send + Sync + 'static,
{
    set_error_reporter(ErrorReporter::new(handler))
}

/// Report a fatal error through the process reporter.
///
/// The lock is released before the handler runs, so a handler may itself
/// install a different reporter.
pub fn fatal_error(error_msg: &str) -> ! {
    error_reporter().fatal(error_msg)
}

/// Fails unless `cond` is true.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !($cond) {
            $crate::check::fatal_error(&format!(
                "{}:{} CHECK_TRUE({})",
                file!(),
                line!(),
                stringify!($cond)
            ));
        }
    };
}

/// Fails unless `cond` is false.
#[macro_export]
macro_rules! check_false {
    ($cond:expr $(,)?) => {
        if $cond {
            $crate::check::fatal_error(&format!(
                "{}:{} CHECK_FALSE({})",
                file!(),
                line!(),
                stringify!($cond)
            ));
        }
    };
}

/// Binary comparison check. Each operand is evaluated once.
#[macro_export]
macro_rules! check_op {
    ($x:expr, $op:tt, $y:expr $(,)?) => {
        match (&$x, &$y) {
            (x, y) => {
                if !(*x $op *y) {
                    $crate::check::fatal_error(&format!(
                        "{}:{} {} {} {}\n{} = {:?}, {} = {:?}",
                        file!(),
                        line!(),
                        stringify!($x),
                        stringify!($op),
                        stringify!($y),
                        stringify!($x),
                        x,
                        stringify!($y),
                        y
                    ));
                }
            }
        }
    };
}

#[macro_export]
macro_rules! check_eq {
    ($x:expr, $y:expr $(,)?) => {
        $crate::check_op!($x, ==, $y)
    };
}

#[macro_export]
macro_rules! check_ne {
    ($x:expr, $y:expr $(,)?) => {
        $crate::check_op!($x, !=, $y)
    };
}

#[macro_export]
macro_rules! check_lt {
    ($x:expr, $y:expr $(,)?) => {
        $crate::check_op!($x, <, $y)
    };
}

#[macro_export]
macro_rules! check_le {
    ($x:expr, $y:expr $(,)?) => {
        $crate::check_op!($x, <=, $y)
    };
}

#[macro_export]
macro_rules! check_gt {
    ($x:expr, $y:expr $(,)?) => {
        $crate::check_op!($x, >, $y)
    };
}

#[macro_export]
macro_rules! check_ge {
    ($x:expr, $y:expr $(,)?) => {
        $crate::check_op!($x, >=, $y)
    };
}

/// Predicate check: `check_fn!(f, a, b)` or `check_fn!(f, a, b, c)` fails
/// unless `f(&a, &b[, &c])` returns true.
#[macro_export]
macro_rules! check_fn {
    ($f:expr, $x:expr, $y:expr $(,)?) => {
        match (&$x, &$y) {
            (x, y) => {
                if !($f)(x, y) {
                    $crate::check::fatal_error(&format!(
                        "{}:{} {}({}, {})\n{} = {:?}, {} = {:?}",
                        file!(),
                        line!(),
                        stringify!($f),
                        stringify!($x),
                        stringify!($y),
                        stringify!($x),
                        x,
                        stringify!($y),
                        y
                    ));
                }
            }
        }
    };
    ($f:expr, $x:expr, $y:expr, $z:expr $(,)?) => {
        match (&$x, &$y, &$z) {
            (x, y, z) => {
                if !($f)(x, y, z) {
                    $crate::check::fatal_error(&format!(
                        "{}:{} {}({}, {}, {})\n{} = {:?}, {} = {:?}, {} = {:?}",
                        file!(),
                        line!(),
                        stringify!($f),
                        stringify!($x),
                        stringify!($y),
                        stringify!($z),
                        stringify!($x),
                        x,
                        stringify!($y),
                        y,
                        stringify!($z),
                        z
                    ));
                }
            }
        }
    };
}

/// Fails unless `x` is a finite value in `[-tol, 1 + tol]`.
#[macro_export]
macro_rules! check_prob_tolerance {
    ($x:expr, $tol:expr $(,)?) => {
        match ($x as f64, $tol as f64) {
            (x, tol) => {
                if !x.is_finite() || !(x >= -tol && x <= 1.0 + tol) {
                    $crate::check::fatal_error(&format!(
                        "{}:{} CHECK_PROB({}) with tolerance {:?}\n{} = {:?}",
                        file!(),
                        line!(),
                        stringify!($x),
                        tol,
                        stringify!($x),
                        x
                    ));
                }
            }
        }
    };
}

/// Fails unless `x` is a finite value in `[0, 1]`.
#[macro_export]
macro_rules! check_prob {
    ($x:expr $(,)?) => {
        $crate::check_prob_tolerance!($x, 0.0)
    };
}

#[macro_export]
macro_rules! check_float_near {
    ($x:expr, $y:expr, $eps:expr $(,)?) => {
        match ($x as f64, $y as f64, $eps as f64) {
            (x, y, eps) => {
                if !((x - y).abs() <= eps) {
                    $crate::check::fatal_error(&format!(
                        "{}:{} |{} - {}| <= {}\n{} = {:?}, {} = {:?}",
                        file!(),
                        line!(),
                        stringify!($x),
                        stringify!($y),
                        stringify!($eps),
                        stringify!($x),
                        x,
                        stringify!($y),
                        y
                    ));
                }
            }
        }
    };
}

#[macro_export]
macro_rules! check_float_eq {
    ($x:expr, $y:expr $(,)?) => {
        $crate::check_float_near!($x, $y, $crate::check::FLOAT_EQ_EPSILON)
    };
}

// Debug-only variants: type-checked everywhere, evaluated only with
// debug_assertions on.

#[macro_export]
macro_rules! dcheck {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_false {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_false!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_eq {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_eq!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_ne {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_ne!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_lt {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_lt!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_le {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_le!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_gt {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_gt!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_ge {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_ge!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_fn {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_fn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_prob {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_prob!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_float_eq {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_float_eq!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! dcheck_float_near {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::check_float_near!($($arg)*);
        }
    };
}
