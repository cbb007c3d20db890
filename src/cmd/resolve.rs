use clap::Args;
use dartforge::error::DartsResult;
use dartforge::geometry::{DartBoard, Point};

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Horizontal offset from the center (mm, right is positive).
    #[arg(long, allow_hyphen_values = true)]
    pub x: f64,

    /// Vertical offset from the center (mm, up is positive).
    #[arg(long, allow_hyphen_values = true)]
    pub y: f64,
}

pub fn run(args: ResolveArgs) -> DartsResult<()> {
    let point = Point::new(args.x, args.y);
    let segment = DartBoard::shared().resolve(point);
    println!(
        "({:.1}, {:.1}) r={:.1}mm -> {} = {} points",
        point.x,
        point.y,
        point.radius(),
        segment,
        segment.score()
    );
    Ok(())
}
