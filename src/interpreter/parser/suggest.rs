use crate::interpreter::parser::utils::canonical;

/// Known opener and closer phrases paired with a complete example statement.
///
/// The example is what the suggestion shows: beginners correct a whole line
/// more easily than a bare keyword.
const COMMAND_SUGGESTIONS: &[(&str, &str)] = &[
    ("set", "set x to 10"),
    ("let", "let x be 10"),
    ("put", "put 10 into x"),
    ("say", "say \"Hello World\""),
    ("print", "print \"Hello World\""),
    ("show", "show \"Hello World\""),
    ("add", "add 5 to x"),
    ("increase", "increase x by 5"),
    ("subtract", "subtract 3 from x"),
    ("decrease", "decrease x by 3"),
    ("multiply", "multiply x by 2"),
    ("divide", "divide x by 4"),
    ("if", "if x is greater than 10 then"),
    ("when", "when x is greater than 10 then"),
    ("otherwise", "otherwise"),
    ("else", "else"),
    ("otherwise if", "otherwise if x is less than 5 then"),
    ("or if", "or if x is less than 5 then"),
    ("repeat", "repeat 5 times"),
    ("do", "do 5 times"),
    ("repeat while", "repeat while x is less than 10"),
    ("while", "while x is less than 10 do"),
    ("for each", "for each item in mylist"),
    ("for every", "for every item in mylist"),
    ("define", "define greet with name"),
    ("function", "function greet with name"),
    ("return", "return x"),
    ("give back", "give back x"),
    ("call", "call greet with \"Alice\""),
    ("run", "run greet with \"Alice\""),
    ("create list", "create list mylist"),
    ("make list", "make list mylist"),
    ("remove", "remove 5 from mylist"),
    ("take", "take 5 from mylist"),
    ("ask", "ask \"What is your name?\" and store in name"),
    ("stop", "stop repeat"),
    ("break", "break loop"),
    ("skip", "skip repeat"),
    ("next", "next loop"),
    ("end if", "end if"),
    ("finish if", "finish if"),
    ("end repeat", "end repeat"),
    ("finish repeat", "finish repeat"),
    ("end for", "end for"),
    ("finish for", "finish for"),
    ("end define", "end define"),
    ("end function", "end function"),
    ("finish function", "finish function"),
];

/// The largest edit distance still worth a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Computes the Levenshtein edit distance between two phrases.
///
/// Classic dynamic-programming implementation over characters; the table is
/// one rolling row since only the previous row is ever needed.
///
/// # Example
/// ```
/// use plaintalk::interpreter::parser::suggest::levenshtein;
///
/// assert_eq!(levenshtein("sya", "say"), 2);
/// assert_eq!(levenshtein("repeat", "repeat"), 0);
/// ```
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Offers a "Did you mean ...?" hint for an unrecognized statement.
///
/// The line's first word and first two words are compared against every known
/// opener phrase; the closest phrase within edit distance 2 wins, favoring
/// the earlier table entry on ties.
#[must_use]
pub fn suggest(text: &str) -> Option<String> {
    let folded = canonical(text);
    let mut words = folded.split(' ');

    let first = words.next()?;
    let first_two = words.next().map(|second| format!("{first} {second}"));

    let mut best: Option<(usize, &str)> = None;
    for (phrase, example) in COMMAND_SUGGESTIONS {
        let mut distance = levenshtein(phrase, first);
        if let Some(two) = &first_two {
            distance = distance.min(levenshtein(phrase, two));
        }
        if distance <= MAX_SUGGESTION_DISTANCE
           && best.is_none_or(|(best_distance, _)| distance < best_distance)
        {
            best = Some((distance, example));
        }
    }

    best.map(|(_, example)| format!("Did you mean '{example}'?"))
}
