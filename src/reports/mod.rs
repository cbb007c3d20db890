use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dartforge::model::{Game, Seat};
use dartforge::stats::PlayerStats;

fn new_table(headers: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn align_right(table: &mut Table, columns: std::ops::Range<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn seat_name(game: &Game, seat: Option<Seat>) -> String {
    match seat.and_then(|s| game.players.get(s)) {
        Some(p) => p.name.clone(),
        None => "-".to_string(),
    }
}

/// One row per leg: who started, who won and how many darts it took.
pub fn match_summary(game: &Game) {
    let mut table = new_table(vec![
        Cell::new("Set").add_attribute(Attribute::Bold),
        Cell::new("Leg").add_attribute(Attribute::Bold),
        Cell::new("Beginner"),
        Cell::new("Winner").fg(Color::Green),
        Cell::new("Takes"),
        Cell::new("Darts"),
    ]);

    for (s, set) in game.sets.iter().enumerate() {
        for (l, leg) in set.legs.iter().enumerate() {
            table.add_row(vec![
                Cell::new(s + 1),
                Cell::new(l + 1),
                Cell::new(seat_name(game, Some(leg.beginner))),
                Cell::new(seat_name(game, leg.winner)).fg(Color::Green),
                Cell::new(leg.takes.len()),
                Cell::new(leg.dart_count()),
            ]);
        }
    }
    align_right(&mut table, 4..6);

    println!("\n🎯 {} #{} ({})", game.variant, game.id, game.status);
    println!("{}", table);
    println!("Winner: {}", seat_name(game, game.winner));
}

pub fn player_stats(stats: &[PlayerStats]) {
    let mut table = new_table(vec![
        Cell::new("Player").add_attribute(Attribute::Bold),
        Cell::new("Darts"),
        Cell::new("Points"),
        Cell::new("3-Dart Avg").fg(Color::Cyan),
        Cell::new("Legs"),
        Cell::new("Sets"),
    ]);

    for s in stats {
        table.add_row(vec![
            Cell::new(&s.name).add_attribute(Attribute::Bold),
            Cell::new(s.darts_thrown),
            Cell::new(s.points),
            Cell::new(format!("{:.2}", s.three_dart_average)).fg(Color::Cyan),
            Cell::new(s.legs_won),
            Cell::new(s.sets_won),
        ]);
    }
    align_right(&mut table, 1..6);
    println!("{}", table);
}

pub fn game_list(games: &[Game]) {
    let mut table = new_table(vec![
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Variant"),
        Cell::new("Status"),
        Cell::new("Players"),
        Cell::new("Sets"),
        Cell::new("Winner").fg(Color::Green),
    ]);

    for game in games {
        let players = game
            .players
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(game.id),
            Cell::new(&game.variant),
            Cell::new(game.status),
            Cell::new(players),
            Cell::new(game.sets.len()),
            Cell::new(seat_name(game, game.winner)).fg(Color::Green),
        ]);
    }
    println!("{}", table);
}

pub struct BenchRow {
    pub profile: String,
    pub h_dev: f64,
    pub v_dev: f64,
    pub legs: usize,
    pub avg_darts: f64,
    pub best: usize,
    pub worst: usize,
}

pub fn bench(rows: &[BenchRow]) {
    let mut table = new_table(vec![
        Cell::new("Profile").add_attribute(Attribute::Bold),
        Cell::new("σx mm"),
        Cell::new("σy mm"),
        Cell::new("Legs"),
        Cell::new("Avg Darts").fg(Color::Cyan),
        Cell::new("Best").fg(Color::Green),
        Cell::new("Worst").fg(Color::Red),
    ]);

    for r in rows {
        table.add_row(vec![
            Cell::new(&r.profile).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", r.h_dev)),
            Cell::new(format!("{:.1}", r.v_dev)),
            Cell::new(r.legs),
            Cell::new(format!("{:.2}", r.avg_darts)).fg(Color::Cyan),
            Cell::new(r.best).fg(Color::Green),
            Cell::new(r.worst).fg(Color::Red),
        ]);
    }
    align_right(&mut table, 1..7);
    println!("{}", table);
}
