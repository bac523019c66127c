// Alphabet program used as the harness target in integration tests.
// Reads an alphabet and a count, prints the first `count` characters of the
// alphabet, wrapping around. Negative or non-numeric counts print nothing.

use std::io::{self, BufRead};

fn main() {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Alphabet:");
    let alphabet: Vec<char> = match lines.next() {
        Some(Ok(line)) => line.chars().collect(),
        _ => return,
    };

    println!("Number of letters:");
    let count: i64 = match lines.next() {
        Some(Ok(line)) => line.trim().parse().unwrap_or(-1),
        _ => -1,
    };

    if count <= 0 || alphabet.is_empty() {
        println!();
        return;
    }

    let word: String = (0..count as usize)
        .map(|i| alphabet[i % alphabet.len()])
        .collect();
    println!("{}", word);
}
