// Test complete flow of the application
// Run with `cargo test --test e2e_test`

use std::fs;

use modelex::{compile, KeywordSpec, LexerTable, RuleOptions, RuleSpec, Token};
use regex::Regex;

fn json_lexer() -> LexerTable {
    compile(vec![
        ("lbrace", RuleSpec::literal("{")),
        ("rbrace", RuleSpec::literal("}")),
        ("lbracket", RuleSpec::literal("[")),
        ("rbracket", RuleSpec::literal("]")),
        ("colon", RuleSpec::literal(":")),
        ("comma", RuleSpec::literal(",")),
        (
            "ws",
            RuleOptions::new()
                .regex(r"[ \t\r\n]+")
                .line_breaks()
                .ignore()
                .into(),
        ),
        ("string", RuleSpec::regex(r#""((?:[^"\\\n]|\\.)*)""#)),
        (
            "number",
            RuleSpec::regex(r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?"),
        ),
        (
            "word",
            RuleOptions::new()
                .regex("[a-z]+")
                .keyword_types([
                    KeywordSpec::new("boolean", ["true", "false"]),
                    KeywordSpec::new("null", ["null"]),
                ])
                .into(),
        ),
    ])
    .unwrap()
}

#[test]
fn e2e_test() {
    // Initialize the logger
    let _ = env_logger::builder().is_test(true).try_init();

    // Initialize the regex for newlines. It is used to make the tests platform independent.
    let rx_newline: Regex = Regex::new(r"\r?\n|\r").unwrap();

    let table = json_lexer();
    assert_eq!(
        table.fast_dispatch_chars("start"),
        Some(vec![',', ':', '[', ']', '{', '}'])
    );

    // Iterate over all input files in the data directory
    for entry in fs::read_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data")).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().unwrap() != "input" {
            continue;
        }

        println!("--------------------------------------------------");
        println!("Entry: {:?}", entry.file_name());
        println!("--------------------------------------------------");

        let input = fs::read_to_string(&path).unwrap();
        let input = rx_newline.replace_all(&input, "\n");

        let tokens = table
            .instantiate(&*input)
            .collect::<modelex::Result<Vec<Token>>>()
            .unwrap_or_else(|e| panic!("**** Failed to scan {}: {}", path.display(), e));

        println!("Tokens:\n{}\n", serde_json::to_string(&tokens).unwrap());
        println!("Tokens count: {}", tokens.len());

        // Every token text is found at its offset
        for token in &tokens {
            assert_eq!(&input[token.span().range()], token.text());
        }

        // Tokens survive a serialization round trip
        let serialized = serde_json::to_string(&tokens).unwrap();
        let deserialized: Vec<Token> = serde_json::from_str(&serialized).unwrap();
        assert_eq!(tokens, deserialized);

        // Open the expected output file which has the same base name as the input file but with
        // a .tokens extension.
        let token_file_path = path.with_extension("tokens");
        let token_file = fs::File::open(&token_file_path).unwrap();
        let expected: Vec<(String, String, usize, usize)> =
            serde_json::from_reader(&token_file).unwrap();

        let actual = tokens
            .iter()
            .map(|t| {
                (
                    t.token_type().to_string(),
                    t.value().to_string(),
                    t.line(),
                    t.col(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(actual, expected);
    }
}
