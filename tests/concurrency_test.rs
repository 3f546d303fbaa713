// Parses on many threads at once
//
// Every parse owns its input, tree and error. Threads that parse the same
// inputs, with the same or different limits, must build the same trees as a
// single-threaded run.

use std::thread;
use vimexpr::{Builder, Error, parse, sexpr};

const INPUTS: &[&str] = &[
    "d.a-b.c + f(1)->g()",
    "d['a']-b",
    "x->{a, b -> a + b}(2) ?? #{k-1: [1, 2.5]}",
    "a ? b : c ? d : e",
    "l[i : j][0] .. 'tail'",
    "&l:tw * $COLUMNS - @a",
    "[1, 2,",
    "0zFF",
];

fn render(result: Result<vimexpr::Expr, Error>) -> String {
    match result {
        Ok(expr) => sexpr(&expr),
        Err(e) => format!("error: {e}"),
    }
}

#[test]
fn concurrent_parses_agree_with_sequential() {
    let expected: Vec<String> = INPUTS.iter().map(|input| render(parse(input))).collect();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            thread::spawn(move || {
                // Distinct limits, all far above what these inputs need
                let parser = Builder::default()
                    .max_call_limit(1_000_000 * (worker + 1))
                    .build();
                (0..50)
                    .flat_map(|_| INPUTS.iter())
                    .map(|input| render(parser.parse(input)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let results = handle.join().expect("worker panicked");
        for (i, result) in results.iter().enumerate() {
            let k = i % INPUTS.len();
            assert_eq!(result, &expected[k], "input {:?}", INPUTS[k]);
        }
    }
}
