use clap::Parser;
use ladders_rs::board::{Board, JumpLayout};
use ladders_rs::coords::{GridCoord, cell_to_coord, cells};
use ladders_rs::types::JumpKind;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "ladders-export-board")]
#[command(about = "Print a board's cell grid and jumps as JSON")]
struct Args {
    /// Jump layout: CLASSIC, RANDOM, or RANDOM:<ladders>:<snakes>
    #[arg(long, default_value = "RANDOM")]
    layout: String,

    /// Random seed for procedural layouts
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Serialize)]
struct CellExport {
    cell: u8,
    #[serde(flatten)]
    coord: GridCoord,
}

#[derive(Serialize)]
struct JumpExport {
    start: u8,
    end: u8,
    kind: Option<JumpKind>,
}

#[derive(Serialize)]
struct BoardExport {
    layout: String,
    cells: Vec<CellExport>,
    jumps: Vec<JumpExport>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let layout = args.layout.parse::<JumpLayout>().unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });
    let mut rng = StdRng::seed_from_u64(args.seed);
    let board = Board::build_with_rng(layout, &mut rng).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });

    let cells = cells()
        .map(|cell| cell_to_coord(cell).map(|coord| CellExport { cell, coord }))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|err| {
            eprintln!("Error: {err}");
            std::process::exit(1);
        });

    let export = BoardExport {
        layout: board.layout.to_string(),
        cells,
        jumps: board
            .jumps
            .jumps()
            .into_iter()
            .map(|jump| JumpExport {
                start: jump.start,
                end: jump.end,
                kind: jump.kind(),
            })
            .collect(),
    };

    match serde_json::to_string_pretty(&export) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
