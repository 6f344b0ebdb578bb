//! # Supplier Match Checker
//!
//! Small debugging tool for the name-resolution rules: shows how two
//! supplier names normalize and whether they would merge at a given
//! similarity threshold.
//!
//! ```text
//! cargo run --bin check_supplier_match -- "GreenSteel Inc." "Greensteel Incorporated"
//! cargo run --bin check_supplier_match -- --threshold 0.9 "Roxul" "Rockwool"
//! ```

use clap::Parser;
use terrazzo::config::DEFAULT_SIMILARITY_THRESHOLD;
use terrazzo::supplier::matching::name_similarity;
use terrazzo::supplier::normalizer::normalize_name;

#[derive(Parser)]
#[command(about = "Show how two supplier names normalize and whether they would merge")]
struct Cli {
    /// First supplier name
    name1: String,

    /// Second supplier name
    name2: String,

    /// Similarity threshold to test against, 0.0 to 1.0
    #[arg(short, long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    threshold: f64,
}

fn main() {
    let cli = Cli::parse();

    let key1 = normalize_name(&cli.name1);
    let key2 = normalize_name(&cli.name2);

    println!("'{}' → '{}'", cli.name1, key1);
    println!("'{}' → '{}'", cli.name2, key2);

    if key1.is_empty() || key2.is_empty() {
        println!("verdict: NO MERGE (a name normalized to nothing and would be skipped)");
        return;
    }

    if key1 == key2 {
        println!("verdict: MERGE (exact key match)");
        return;
    }

    let similarity = name_similarity(&key1, &key2);
    println!(
        "similarity: {:.3} (threshold {:.3})",
        similarity, cli.threshold
    );

    let same_block = key1.chars().next() == key2.chars().next();
    if !same_block {
        println!("verdict: NO MERGE (different first letters, never compared)");
    } else if similarity >= cli.threshold {
        println!("verdict: MERGE (fuzzy key match)");
    } else {
        println!("verdict: NO MERGE (below threshold)");
    }
}
