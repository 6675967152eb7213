use log::error;
use std::env;
use wellness_recipes::{BulkImporter, MealPlanRequest, RecipeApiClient, RecipeSearch, TimeFrame};

const USAGE: &str = "Usage:
  wellness-recipes search <query> [diet]
  wellness-recipes recipe <id>
  wellness-recipes ingredient <name>
  wellness-recipes import <name>...
  wellness-recipes plan <calories> [day|week]";

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => {
            eprintln!("{}", USAGE);
            return Err("Please provide a command".into());
        }
    };

    let client = RecipeApiClient::from_env()?;

    match (command, rest) {
        ("search", [query, tail @ ..]) => {
            let mut search = RecipeSearch::new().query(query.as_str());
            if let Some(diet) = tail.first() {
                search = search.diet(diet.as_str());
            }
            print_json(&client.search_normalized_recipes(&search)?)?;
        }
        ("recipe", [id]) => {
            print_json(&client.fetch_recipe(id.parse()?)?)?;
        }
        ("ingredient", [_, ..]) => {
            let name = rest.join(" ");
            let report = BulkImporter::new(&client).import(std::slice::from_ref(&name));
            match report.imported.first() {
                Some(ingredient) => print_json(ingredient)?,
                None => {
                    error!("Could not import ingredient '{}'", name);
                    return Err(format!("No ingredient found for '{}'", name).into());
                }
            }
        }
        ("import", names) if !names.is_empty() => {
            let report = BulkImporter::new(&client).import(names);
            print_json(&report.imported)?;
            for skipped in &report.skipped {
                eprintln!("skipped {}: {}", skipped.name, skipped.reason);
            }
        }
        ("plan", [calories, tail @ ..]) => {
            let time_frame = match tail.first().map(String::as_str) {
                Some("week") => TimeFrame::Week,
                _ => TimeFrame::Day,
            };
            let request = MealPlanRequest::new(time_frame).target_calories(calories.parse()?);
            print_json(&client.generate_meal_plan(&request)?)?;
        }
        _ => {
            eprintln!("{}", USAGE);
            return Err(format!("Unknown or incomplete command '{}'", command).into());
        }
    }

    eprintln!("{} upstream requests left today", client.remaining_requests());
    Ok(())
}
