//! Every phrasing in the alias table must behave exactly like its canonical
//! form: same output, same final state.

use std::{cell::RefCell, rc::Rc};

use plaintalk::{interpreter::evaluator::core::Context, run_source};

fn run_capture(source: &str) -> String {
    let output = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&output);

    let mut context = Context::with_io(100_000,
                                       Box::new(move |text| {
                                           let mut sink = sink.borrow_mut();
                                           sink.push_str(text);
                                           sink.push('\n');
                                       }),
                                       Box::new(|_prompt| String::new()));

    if let Err(error) = run_source(source, &mut context) {
        panic!("program failed: {error}\n{source}");
    }
    let captured = output.borrow().clone();
    captured
}

fn assert_same_output(canonical: &str, alias: &str) {
    let canonical_output = run_capture(canonical);
    let alias_output = run_capture(alias);
    assert_eq!(canonical_output, alias_output,
               "alias program diverged\ncanonical:\n{canonical}\nalias:\n{alias}");
}

#[test]
fn assignment_aliases() {
    assert_same_output("set x to 10\nsay x", "let x be 10\nsay x");
    assert_same_output("set x to 10\nsay x", "put 10 into x\nsay x");
}

#[test]
fn say_aliases() {
    assert_same_output("say \"hi\"", "print \"hi\"");
    assert_same_output("say \"hi\"", "show \"hi\"");
}

#[test]
fn math_mutation_aliases() {
    assert_same_output("set x to 1\nadd 5 to x\nsay x", "set x to 1\nincrease x by 5\nsay x");
    assert_same_output("set x to 9\nsubtract 3 from x\nsay x",
                       "set x to 9\ndecrease x by 3\nsay x");
}

#[test]
fn list_aliases() {
    assert_same_output("create list l\nadd 1 to l\nsay l", "make list l\nadd 1 to l\nsay l");
    assert_same_output("create list l\nadd 1 to l\nremove 1 from l\nsay l",
                       "create list l\nadd 1 to l\ntake 1 from l\nsay l");
}

#[test]
fn if_aliases() {
    let canonical = "set x to 5\nif x equals 5 then\nsay \"eq\"\nend if";
    assert_same_output(canonical, "set x to 5\nwhen x equals 5 then\nsay \"eq\"\nend if");
    assert_same_output(canonical, "set x to 5\nif x equals 5 then\nsay \"eq\"\nfinish if");

    let canonical = "set x to 1\nif x equals 2 then\nsay \"a\"\notherwise\nsay \"b\"\nend if";
    let alias = "set x to 1\nif x equals 2 then\nsay \"a\"\nelse\nsay \"b\"\nend if";
    assert_same_output(canonical, alias);

    let canonical =
        "set x to 3\nif x equals 2 then\nsay \"a\"\notherwise if x equals 3 then\nsay \"b\"\nend if";
    let alias =
        "set x to 3\nif x equals 2 then\nsay \"a\"\nor if x equals 3 then\nsay \"b\"\nend if";
    assert_same_output(canonical, alias);
}

#[test]
fn repeat_aliases() {
    assert_same_output("repeat 3 times\nsay \"x\"\nend repeat",
                       "do 3 times\nsay \"x\"\nend repeat");
    assert_same_output("repeat 3 times\nsay \"x\"\nend repeat",
                       "repeat 3 times\nsay \"x\"\nfinish repeat");

    let canonical = "set i to 0\nrepeat while i is less than 2\nadd 1 to i\nsay i\nend repeat";
    let alias = "set i to 0\nwhile i is less than 2 do\nadd 1 to i\nsay i\nend repeat";
    assert_same_output(canonical, alias);
}

#[test]
fn for_each_aliases() {
    let canonical = "for each ch in \"ab\"\nsay ch\nend for";
    assert_same_output(canonical, "for every ch in \"ab\"\nsay ch\nend for");
    assert_same_output(canonical, "for each ch in \"ab\"\nsay ch\nfinish for");
}

#[test]
fn define_aliases() {
    let canonical = "define greet with name\nsay \"hi \" + name\nend define\ncall greet with \"Bo\"";
    assert_same_output(canonical,
                       "function greet with name\nsay \"hi \" + name\nend define\ncall greet with \"Bo\"");
    assert_same_output(canonical,
                       "define greet with name\nsay \"hi \" + name\nend function\ncall greet with \"Bo\"");
    assert_same_output(canonical,
                       "define greet with name\nsay \"hi \" + name\nfinish function\ncall greet with \"Bo\"");
}

#[test]
fn return_and_call_aliases() {
    let canonical = "define two\nreturn 2\nend define\nsay call two";
    assert_same_output(canonical, "define two\ngive back 2\nend define\nsay call two");
    assert_same_output(canonical, "define two\nreturn 2\nend define\nsay run two");
}

#[test]
fn loop_control_aliases() {
    let canonical = "repeat 5 times\nsay \"once\"\nstop\nend repeat";
    assert_same_output(canonical, "repeat 5 times\nsay \"once\"\nbreak loop\nend repeat");
    assert_same_output(canonical, "repeat 5 times\nsay \"once\"\nstop repeat\nend repeat");

    let canonical = r#"set i to 0
repeat while i is less than 3
add 1 to i
if i equals 2 then
skip
end if
say i
end repeat"#;
    assert_same_output(canonical, &canonical.replace("skip", "next loop"));
    assert_same_output(canonical, &canonical.replace("skip", "skip repeat"));
}

#[test]
fn parameter_list_styles_agree() {
    let commas = "define add3 with a, b, c\nreturn a + b + c\nend define\nsay add3(1, 2, 3)";
    let ands = "define add3 with a and b and c\nreturn a + b + c\nend define\nsay add3(1, 2, 3)";
    assert_same_output(commas, ands);
}
