use std::{cell::RefCell, fs, rc::Rc};

use plaintalk::{interpreter::evaluator::core::Context, run_source};

/// Runs a program with captured output and no input.
fn run_capture(source: &str) -> Result<String, String> {
    run_with_input(source, &[])
}

/// Runs a program with captured output, answering `ask` prompts from a
/// scripted list.
fn run_with_input(source: &str, answers: &[&str]) -> Result<String, String> {
    let output = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&output);

    let answers: Vec<String> = answers.iter().map(ToString::to_string).collect();
    let cursor = RefCell::new(0_usize);

    let mut context =
        Context::with_io(100_000,
                         Box::new(move |text| {
                             let mut sink = sink.borrow_mut();
                             sink.push_str(text);
                             sink.push('\n');
                         }),
                         Box::new(move |_prompt| {
                             let mut index = cursor.borrow_mut();
                             let answer = answers.get(*index).cloned().unwrap_or_default();
                             *index += 1;
                             answer
                         }));

    run_source(source, &mut context).map_err(|error| error.to_string())?;
    let captured = output.borrow().clone();
    Ok(captured)
}

fn assert_output(source: &str, expected: &str) {
    match run_capture(source) {
        Ok(output) => assert_eq!(output, expected, "program:\n{source}"),
        Err(error) => panic!("program failed: {error}\n{source}"),
    }
}

fn assert_failure_mentions(source: &str, needles: &[&str]) {
    match run_capture(source) {
        Ok(output) => panic!("program succeeded but was expected to fail:\n{source}\n{output}"),
        Err(error) => {
            for needle in needles {
                assert!(error.contains(needle), "error '{error}' should mention '{needle}'");
            }
        },
    }
}

#[test]
fn arithmetic_on_a_variable() {
    assert_output("set x to 10\nsay x + 5", "15\n");
}

#[test]
fn list_create_add_remove_and_print() {
    let source = "create list nums\nadd 5 to nums\nadd 8 to nums\nremove 5 from nums\nsay nums";
    assert_output(source, "[8]\n");
}

#[test]
fn if_chain_picks_the_first_true_branch() {
    let source = r#"set score to 85
if score is at least 90 then
say "A"
otherwise if score is at least 80 then
say "B"
otherwise
say "C"
end if"#;
    assert_output(source, "B\n");
}

#[test]
fn function_call_in_expression_position() {
    let source = "define square with n\nreturn n * n\nend define\nsay call square with 12";
    assert_output(source, "144\n");
}

#[test]
fn repeat_while_counts_up() {
    let source = "set x to 0\nrepeat while x is less than 3\nadd 1 to x\nsay x\nend repeat";
    assert_output(source, "1\n2\n3\n");
}

#[test]
fn stop_outside_a_loop_is_an_error() {
    assert_failure_mentions("stop", &["stop", "outside"]);
}

#[test]
fn skip_outside_a_loop_is_an_error() {
    assert_failure_mentions("skip", &["skip", "outside"]);
}

#[test]
fn return_outside_a_function_is_an_error() {
    assert_failure_mentions("return 5", &["return", "outside"]);
}

#[test]
fn errors_carry_the_offending_line_number() {
    assert_failure_mentions("set x to 1\nset y to 2\nsay missing", &["line 3"]);
    assert_failure_mentions("say 1\nsay 1 /", &["line 2"]);
}

#[test]
fn typo_gets_a_suggestion() {
    assert_failure_mentions("sey \"hi\"", &["Did you mean", "say"]);
}

#[test]
fn unknown_gibberish_gets_generic_help() {
    assert_failure_mentions("zzzzqqq everywhere", &["I don't understand"]);
}

#[test]
fn closing_phrase_without_a_block_is_rejected() {
    assert_failure_mentions("end if", &["out of place"]);
    assert_failure_mentions("say 1\nend repeat", &["out of place"]);
}

#[test]
fn unterminated_block_is_rejected() {
    assert_failure_mentions("repeat 3 times\nsay 1", &["still waiting for", "end repeat"]);
}

#[test]
fn mixed_parameter_styles_are_rejected() {
    assert_failure_mentions("define f with a, b and c\nend define", &["not both"]);
}

#[test]
fn bad_parameter_name_is_rejected() {
    assert_failure_mentions("define f with 5x\nend define", &["parameter"]);
}

#[test]
fn scope_new_names_stay_local_to_the_function() {
    let source = "define f\nset local_only to 5\nend define\ncall f\nsay local_only";
    assert_failure_mentions(source, &["local_only"]);
}

#[test]
fn scope_existing_globals_update_through_functions() {
    let source = "set total to 0\ndefine bump\nadd 10 to total\nend define\ncall bump\ncall bump\nsay total";
    assert_output(source, "20\n");
}

#[test]
fn functions_see_globals_but_not_caller_locals() {
    let source = r#"set shared to 1
define inner
say shared
end define
define outer
set hidden to 99
call inner
end define
call outer"#;
    assert_output(source, "1\n");

    let source = r#"define inner
say hidden
end define
define outer
set hidden to 99
call inner
end define
call outer"#;
    assert_failure_mentions(source, &["hidden"]);
}

#[test]
fn arity_mismatch_runs_no_side_effects() {
    let source = r#"define pair with a, b
say "ran"
end define
call pair with 1"#;
    match run_capture(source) {
        Ok(_) => panic!("expected an arity error"),
        Err(error) => {
            assert!(error.contains("2 argument(s)"), "{error}");
            assert!(error.contains("got 1"), "{error}");
        },
    }
}

#[test]
fn recursion_works() {
    let source = r#"define fact with n
if n is at most 1 then
return 1
end if
return n * fact(n - 1)
end define
say call fact with 5"#;
    assert_output(source, "120\n");
}

#[test]
fn runaway_loop_is_cut_off_before_later_statements() {
    let source = "repeat while 1 is less than 2\nset x to 1\nend repeat\nsay \"after\"";
    match run_capture(source) {
        Ok(_) => panic!("expected a runaway loop error"),
        Err(error) => assert!(error.contains("forever"), "{error}"),
    }
}

#[test]
fn repeat_count_must_be_a_whole_number() {
    assert_failure_mentions("repeat \"three\" times\nsay 1\nend repeat", &["whole number"]);
    assert_failure_mentions("repeat -1 times\nsay 1\nend repeat", &["zero or greater"]);
}

#[test]
fn for_each_walks_lists_and_text() {
    let source = "create list items\nadd 2 to items\nadd 4 to items\nfor each n in items\nsay n * 10\nend for";
    assert_output(source, "20\n40\n");

    assert_output("for each letter in \"abc\"\nsay letter\nend for", "a\nb\nc\n");
}

#[test]
fn stop_and_skip_inside_loops() {
    let source = "repeat 5 times\nsay \"x\"\nstop\nend repeat";
    assert_output(source, "x\n");

    let source = r#"set i to 0
repeat while i is less than 4
add 1 to i
if i equals 2 then
skip
end if
say i
end repeat"#;
    assert_output(source, "1\n3\n4\n");
}

#[test]
fn conditions_cover_the_phrase_table() {
    assert_output("if 3 is greater than 2 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 2 is smaller than 3 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 3 is at least 3 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 3 is at most 3 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 3 equals 3 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 3 is not 4 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 3 is not equal to 4 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 4 is greater than or equal to 4 then\nsay \"y\"\nend if", "y\n");
    assert_output("if 4 is less than or equal to 4 then\nsay \"y\"\nend if", "y\n");
}

#[test]
fn contains_works_on_lists_and_text() {
    let source = "create list pets\nadd \"cat\" to pets\nif pets contains \"cat\" then\nsay \"found\"\nend if";
    assert_output(source, "found\n");

    assert_output("if \"hello\" contains \"ell\" then\nsay \"yes\"\nend if", "yes\n");
    assert_output("if \"hello\" does not contain \"xyz\" then\nsay \"clean\"\nend if", "clean\n");
}

#[test]
fn bare_conditions_use_truthiness() {
    assert_output("set flag to true\nif flag then\nsay \"on\"\nend if", "on\n");
    assert_output("create list empty\nif empty then\nsay \"no\"\notherwise\nsay \"empty\"\nend if",
                  "empty\n");
}

#[test]
fn keywords_inside_text_literals_do_not_split_conditions() {
    let source = "set phrase to \"less than nothing\"\nif phrase contains \"less than\" then\nsay \"kept\"\nend if";
    assert_output(source, "kept\n");
}

#[test]
fn ask_stores_the_answer_as_text() {
    let source = "ask \"Name? \" and store in name\nsay \"hi \" + name";
    match run_with_input(source, &["Ada"]) {
        Ok(output) => assert_eq!(output, "hi Ada\n"),
        Err(error) => panic!("{error}"),
    }
}

#[test]
fn expression_features_work() {
    assert_output("say [1, 2, 3][1]", "2\n");
    assert_output("set word to \"plain\"\nsay word[0]", "p\n");
    assert_output("say \"abcdef\"[1:4]", "bcd\n");
    assert_output("say \"abcdef\"[:2]", "ab\n");
    assert_output("say \"abcdef\"[4:]", "ef\n");
    assert_output("say [1, 2, 3][-1]", "3\n");
    assert_output("say len(\"hello\")", "5\n");
    assert_output("say str(5) + \"!\"", "5!\n");
    assert_output("say int(\"42\") + 1", "43\n");
    assert_output("say 7 % 3", "1\n");
    assert_output("say 10 / 4", "2.5\n");
    assert_output("say (2 + 3) * 4", "20\n");
    assert_output("say not false", "true\n");
    assert_output("say 1 < 2 and 3 < 4", "true\n");
    assert_output("say min(4, 2, 9)", "2\n");
    assert_output("say max([4, 2, 9])", "9\n");
    assert_output("say sum([1, 2, 3])", "6\n");
    assert_output("say sorted([3, 1, 2])", "[1, 2, 3]\n");
    assert_output("say abs(-7)", "7\n");
    assert_output("say round(3.7)", "4\n");
    assert_output("say range(1, 4)", "[1, 2, 3]\n");
    assert_output("say nothing", "nothing\n");
}

#[test]
fn random_phrases_stay_in_bounds() {
    let source = r#"set r to random between 1 and 3
if r is at least 1 then
if r is at most 3 then
say "ok"
end if
end if"#;
    assert_output(source, "ok\n");

    let source = "set r to random\nif r is at least 0 then\nif r is less than 1 then\nsay \"ok\"\nend if\nend if";
    assert_output(source, "ok\n");

    let source = "set pick to random choice from [5]\nsay pick";
    assert_output(source, "5\n");
}

#[test]
fn lists_are_shared_by_identity() {
    let source = "create list a\nset b to a\nadd 1 to a\nsay b";
    assert_output(source, "[1]\n");
}

#[test]
fn string_concat_needs_explicit_str() {
    assert_failure_mentions("say \"total: \" + 5", &["str("]);
    assert_output("say \"total: \" + str(5)", "total: 5\n");
}

#[test]
fn division_by_zero_is_an_error() {
    assert_failure_mentions("say 1 / 0", &["zero"]);
    assert_failure_mentions("set x to 5\ndivide x by 0", &["zero"]);
}

#[test]
fn removing_a_missing_item_is_an_error() {
    assert_failure_mentions("create list l\nremove 9 from l", &["not in"]);
}

#[test]
fn math_mutations_need_an_existing_numeric_target() {
    assert_failure_mentions("add 1 to ghost", &["ghost"]);
    assert_failure_mentions("set s to \"hi\"\nadd 1 to s", &["math"]);
}

#[test]
fn returning_nothing_and_bare_calls() {
    let source = "define noop\nreturn\nend define\nsay call noop";
    assert_output(source, "nothing\n");

    // Statement-position calls discard the result.
    let source = "define make with n\nreturn n\nend define\ncall make with 5\nsay \"done\"";
    assert_output(source, "done\n");
}

#[test]
fn bare_builtin_call_as_a_statement() {
    assert_output("sleep(0)\nsay \"woke\"", "woke\n");
}

#[test]
fn comments_and_blank_lines_are_skipped_but_counted() {
    let source = "# greeting\n\nsay \"hi\"\n# trailing";
    assert_output(source, "hi\n");

    assert_failure_mentions("# one\n\nsay oops", &["line 3"]);
}

#[test]
fn leading_bom_is_tolerated_and_nul_is_rejected() {
    assert_output("\u{feff}say \"ok\"", "ok\n");
    assert_failure_mentions("say 1\nsay \"a\0b\"", &["null", "line 2"]);
}

#[test]
fn if_branches_are_exclusive() {
    let source = r#"set n to 10
if n is at least 1 then
say "first"
otherwise if n is at least 2 then
say "second"
otherwise
say "third"
end if"#;
    assert_output(source, "first\n");
}

#[test]
fn otherwise_inside_else_body_is_rejected() {
    let source = "if 1 equals 1 then\nsay \"a\"\notherwise\nsay \"b\"\notherwise\nsay \"c\"\nend if";
    assert_failure_mentions(source, &["out of place"]);
}

#[test]
fn example_script_runs() {
    let source = fs::read_to_string("tests/example.talk").expect("missing file");
    let output = run_with_input(&source, &["Ada"]).expect("example script failed");
    assert!(output.contains("Hello, Ada!"), "{output}");
    assert!(output.contains("total: 60"), "{output}");
}
