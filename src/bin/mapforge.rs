//! CLI driver: load a generator tree, run it over a fresh seeded map, and
//! print or render the result.

use clap::Parser;
use mapforge::{render_ascii, Canvas, Cli, Map, MapForgeError, Rng};
use std::process::ExitCode;

fn run(cli: &Cli) -> Result<(), MapForgeError> {
    let generator = mapforge::load_generator(&cli.input)?;
    let mut rng = Rng::seed_from_u64(cli.resolved_seed() as u64);
    let mut map = Map::new(cli.size as i32, cli.size as i32);
    let ok = generator.make(&mut Canvas::whole(&mut map), &mut rng);
    if !ok {
        return Err(MapForgeError::GenerationFailed);
    }

    match &cli.render {
        Some(path) => {
            let rendered = render_ascii(&map, path).map_err(|source| MapForgeError::Io {
                path: path.clone(),
                source,
            })?;
            print!("{rendered}");
        }
        None => {
            for cell in map.bounds().iter() {
                for t in map.tokens(cell) {
                    print!("{t}, ");
                }
                println!();
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
