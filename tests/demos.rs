//! Sweeps the demos directory and runs every script to completion.

use std::{cell::RefCell, fs, rc::Rc};

use plaintalk::{interpreter::evaluator::core::Context, run_source};
use walkdir::WalkDir;

#[test]
fn demo_scripts_run_cleanly() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| {
                                          e.path().extension().is_some_and(|ext| ext == "talk")
                                      })
    {
        count += 1;
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        let output = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&output);
        let mut context = Context::with_io(100_000,
                                           Box::new(move |text| {
                                               let mut sink = sink.borrow_mut();
                                               sink.push_str(text);
                                               sink.push('\n');
                                           }),
                                           Box::new(|_prompt| "tester".to_string()));

        if let Err(e) = run_source(&source, &mut context) {
            panic!("Demo {path:?} failed:\n{e}");
        }
    }

    assert!(count > 0, "No demo scripts found in demos/");
}
