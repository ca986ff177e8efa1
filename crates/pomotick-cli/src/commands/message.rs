use pomotick_core::timer::{Category, MessagePicker};

pub fn run(category: &str, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let category: Category = category.parse()?;
    let mut picker = MessagePicker::from_seed(seed);
    println!("{}", picker.select(category));
    Ok(())
}
