//! Common test utilities

#![allow(dead_code)]

use cmdtree::{Command, Context, OnParseError};
use std::cell::RefCell;
use std::rc::Rc;

/// Log of action invocations: (command label, positional args)
pub type CallLog = Rc<RefCell<Vec<(String, Vec<String>)>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// A command whose action records its arguments under `label`
pub fn recording(name: &str, label: &str, log: &CallLog) -> Command {
    let log = Rc::clone(log);
    let label = label.to_string();
    Command::new(name).action(move |_ctx, args| {
        log.borrow_mut().push((label.clone(), args.to_vec()));
        Ok(())
    })
}

/// Dispatch with parse errors returned, capturing help output
pub fn dispatch(root: &mut Command, args: &[&str]) -> (cmdtree::Result<()>, String) {
    let mut out = Vec::new();
    let result = root.dispatch_to(&Context::new(), args.iter().copied(), &mut out);
    (result, String::from_utf8(out).unwrap())
}

/// Root command that returns parse errors instead of exiting
pub fn root(name: &str) -> Command {
    Command::new(name).on_parse_error(OnParseError::ReturnError)
}
