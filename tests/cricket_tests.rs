mod common;

use common::*;
use dartforge::model::TakeResult;
use dartforge::rules::options::OptionValue;

#[test]
fn marks_beyond_three_score_until_everyone_closed() {
    let (mut orch, _) = started("cricket", &[], &["Ada", "Bob", "Cy"]);

    take(&mut orch, &[t(20), s(20), MISS]);
    assert_eq!(orch.scores(), &[20, 0, 0]);

    take(&mut orch, &[t(20), s(20), MISS]);
    assert_eq!(orch.scores(), &[20, 20, 0]);

    // Cy closes 20 for everyone.
    take(&mut orch, &[t(20), MISS, MISS]);
    assert_eq!(orch.scores(), &[20, 20, 0]);

    take(&mut orch, &[s(20), t(20), MISS]);
    assert_eq!(orch.scores(), &[20, 20, 0]);
}

#[test]
fn non_goal_sectors_count_for_nothing() {
    let (mut orch, _) = started("cricket", &[], &["Ada", "Bob"]);
    take(&mut orch, &[t(14), t(1), d(2)]);
    assert_eq!(orch.scores(), &[0, 0]);
}

#[test]
fn cut_throat_points_go_to_open_opponents() {
    let (mut orch, _) = started(
        "cricket",
        &[("cut_throat", OptionValue::Bool(true))],
        &["Ada", "Bob", "Cy"],
    );
    take(&mut orch, &[t(19), t(19), MISS]);
    assert_eq!(orch.scores(), &[0, 57, 57]);

    take(&mut orch, &[t(19), s(19), MISS]);
    assert_eq!(orch.scores(), &[0, 57, 76]);
}

#[test]
fn closing_everything_while_leading_wins() {
    let (mut orch, _) = started(
        "cricket",
        &[("legs_to_set", OptionValue::Int(1))],
        &["Ada", "Bob"],
    );
    let rounds = [
        [t(20), t(19), t(18)],
        [t(17), t(16), t(15)],
    ];
    for darts in &rounds {
        take(&mut orch, darts);
        take(&mut orch, &[MISS, MISS, MISS]);
    }
    throw(&mut orch, at(seg(25, dartforge::geometry::Bed::Single)));
    throw(&mut orch, d(25));

    let take = orch.game().current_take_of(0).unwrap();
    assert_eq!(take.result, Some(TakeResult::Win));
    assert_eq!(take.size(), 2);
    assert_eq!(orch.game().winner, Some(0));
}
