//! PuzzleService against real files: input resolution and both answers per puzzle.

use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;

use advent::application::services::{Answer, Puzzle};
use advent::application::ApplicationError;
use advent::config::Settings;
use advent::infrastructure::di::ServiceContainer;
use advent::util::testing::{self, write_puzzle_input};

fn fixture(puzzle: Puzzle) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(puzzle.slug())
        .join("example.txt");
    std::fs::read_to_string(path).unwrap()
}

fn container_for(dir: &Path) -> ServiceContainer {
    ServiceContainer::new(Settings {
        input_dir: dir.to_path_buf(),
        ..Settings::default()
    })
}

#[rstest]
#[case(Puzzle::Snailfish, 4140, 3993)]
#[case(Puzzle::Chiton, 40, 315)]
#[case(Puzzle::SmokeBasin, 15, 1134)]
#[case(Puzzle::Polymer, 1588, 2188189693529)]
#[case(Puzzle::PacketDecoder, 31, 54)]
#[case(Puzzle::TrickShot, 45, 112)]
#[case(Puzzle::TrenchMap, 35, 3351)]
fn given_example_input_when_solving_then_published_answers(
    #[case] puzzle: Puzzle,
    #[case] part1: u64,
    #[case] part2: u64,
) {
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    write_puzzle_input(dir.path(), puzzle.slug(), "input.txt", &fixture(puzzle));
    let container = container_for(dir.path());

    let input = container.puzzles.resolve_input(puzzle, None);
    let answers = container.puzzles.solve(puzzle, &input).unwrap();

    assert_eq!(answers.part1, Answer::Number(part1));
    assert_eq!(answers.part2, Answer::Number(part2));
}

#[test]
fn given_origami_example_when_solving_then_count_and_rendering() {
    let dir = TempDir::new().unwrap();
    let container = container_for(dir.path());

    let answers = container
        .puzzles
        .solve_text(Puzzle::Origami, &fixture(Puzzle::Origami))
        .unwrap();

    assert_eq!(answers.part1, Answer::Number(17));
    assert_eq!(
        answers.part2,
        Answer::Text("#####\n#...#\n#...#\n#...#\n#####".to_string())
    );
}

#[test]
fn given_configured_glyphs_and_steps_when_solving_then_settings_apply() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings {
        input_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    settings.origami.ink = 'X';
    settings.origami.paper = ' ';
    settings.chiton.repeats = 1;
    settings.image.long_steps = 2;
    let container = ServiceContainer::new(settings);

    let origami = container
        .puzzles
        .solve_text(Puzzle::Origami, &fixture(Puzzle::Origami))
        .unwrap();
    let chiton = container
        .puzzles
        .solve_text(Puzzle::Chiton, &fixture(Puzzle::Chiton))
        .unwrap();
    let image = container
        .puzzles
        .solve_text(Puzzle::TrenchMap, &fixture(Puzzle::TrenchMap))
        .unwrap();

    assert!(origami.part2.to_string().starts_with("XXXXX\nX   X"));
    assert_eq!(chiton.part2, Answer::Number(40));
    assert_eq!(image.part2, Answer::Number(35));
}

#[test]
fn given_no_puzzle_dir_when_resolving_then_falls_back_to_shared_input() {
    let dir = TempDir::new().unwrap();
    let container = container_for(dir.path());

    let input = container.puzzles.resolve_input(Puzzle::Chiton, None);

    assert_eq!(input, dir.path().join("input.txt"));
}

#[test]
fn given_puzzle_dir_when_resolving_then_prefers_it() {
    let dir = TempDir::new().unwrap();
    let expected = write_puzzle_input(dir.path(), "chiton", "input.txt", "12\n34\n");
    std::fs::write(dir.path().join("input.txt"), "shared").unwrap();
    let container = container_for(dir.path());

    assert_eq!(container.puzzles.resolve_input(Puzzle::Chiton, None), expected);
}

#[test]
fn given_explicit_path_when_resolving_then_used_verbatim() {
    let dir = TempDir::new().unwrap();
    write_puzzle_input(dir.path(), "chiton", "input.txt", "12\n34\n");
    let container = container_for(dir.path());
    let explicit = Path::new("/some/other/file.txt");

    assert_eq!(
        container.puzzles.resolve_input(Puzzle::Chiton, Some(explicit)),
        explicit
    );
}

#[test]
fn given_missing_input_when_solving_then_input_not_found() {
    let dir = TempDir::new().unwrap();
    let container = container_for(dir.path());
    let missing = dir.path().join("input.txt");

    let err = container.puzzles.solve(Puzzle::Polymer, &missing).unwrap_err();

    assert!(matches!(err, ApplicationError::InputNotFound(path) if path == missing));
}

#[test]
fn given_malformed_input_when_solving_then_domain_error() {
    let dir = TempDir::new().unwrap();
    let input = write_puzzle_input(dir.path(), "smoke-basin", "input.txt", "123\n4a6\n");
    let container = container_for(dir.path());

    let err = container.puzzles.solve(Puzzle::SmokeBasin, &input).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(_)));
}

#[test]
fn given_single_snailfish_number_when_solving_then_part2_is_zero() {
    let dir = TempDir::new().unwrap();
    let container = container_for(dir.path());

    let answers = container.puzzles.solve_text(Puzzle::Snailfish, "[9,1]\n").unwrap();

    assert_eq!(answers.part1, Answer::Number(29));
    assert_eq!(answers.part2, Answer::Number(0));
}

#[rstest]
#[case(Puzzle::PacketDecoder, "D2FE\n")]
#[case(Puzzle::TrickShot, "target area: x=-5..5, y=-5..5\n")]
#[case(Puzzle::TrenchMap, "#\n\n#\n")]
fn given_malformed_packet_target_or_image_when_solving_then_domain_error(
    #[case] puzzle: Puzzle,
    #[case] text: &str,
) {
    let dir = TempDir::new().unwrap();
    let container = container_for(dir.path());

    let err = container.puzzles.solve_text(puzzle, text).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(_)), "{err:?}");
}
