use name_forge::{FileVocabulary, Gender, NameBank, NameConfig, NameGenerator, NameOrder, Origin};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;

/// Generate a handful of dwarf names from the bundled vocabulary
fn main() -> Result<(), Box<dyn Error>> {
    let vocabulary = FileVocabulary::new(concat!(env!("CARGO_MANIFEST_DIR"), "/name-segments"));
    let mut rng = ChaCha8Rng::seed_from_u64(1337);

    // Example 1: the classic titled dwarf
    let config = NameConfig::default();
    let generator = NameGenerator::new(&config, &vocabulary);

    println!("Titled dwarves:");
    for i in 1..=5 {
        println!("{}. {}", i, generator.generate(&mut rng)?);
    }

    // Example 2: both genders, surname first, title and postfix optional
    let config = NameConfig::new(Origin::Mountain, NameBank::Dwarf)
        .with_gender(Gender::Male)
        .with_gender(Gender::Female)
        .with_title_prefix(true)
        .with_optional_segments(true)
        .with_order(NameOrder::Eastern);
    let generator = NameGenerator::new(&config, &vocabulary);

    println!("\nEastern order, optional segments:");
    for i in 1..=5 {
        println!("{}. {}", i, generator.generate(&mut rng)?);
    }

    // Example 3: inspect the compiled grammar
    println!("\nGrammar rules:");
    for (name, alternatives) in generator.grammar().rules() {
        println!("{} -> {} alternatives", name, alternatives.len());
    }

    Ok(())
}
