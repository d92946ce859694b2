//! A thin CLI over the library's file-level entry points: `encode` and
//! `decode`, each taking an input path and an output directory.

use std::path::Path;
use std::process::ExitCode;

use nya::error::Error;

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("nya: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    match args.as_slice() {
        [command, input, output_dir] if command == "encode" => {
            let path = nya::encode_file(Path::new(input), Path::new(output_dir))
                .map_err(|error| describe(error))?;
            println!("wrote {}", path.display());
            Ok(())
        }

        [command, input, output_dir] if command == "decode" => {
            let raster = nya::decode_file(Path::new(input)).map_err(describe)?;

            let stem = Path::new(input).file_stem()
                .ok_or_else(|| "input path has no file name".to_string())?;
            let output_path = Path::new(output_dir).join(stem).with_extension("png");

            raster.save(&output_path).map_err(describe)?;
            println!("wrote {}", output_path.display());
            Ok(())
        }

        _ => Err(usage()),
    }
}

fn describe(error: Error) -> String {
    error.to_string()
}

fn usage() -> String {
    "usage: nya <encode|decode> <input> <output_dir>".to_string()
}
