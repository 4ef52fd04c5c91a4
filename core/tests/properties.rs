use proptest::prelude::*;
use proptest::sample::{Index, select};

use rollbox_core::*;

fn letter() -> impl Strategy<Value = Letter> {
    select(Letter::ALL.to_vec())
}

fn direction() -> impl Strategy<Value = Direction> {
    select(Direction::ALL.to_vec())
}

fn faces() -> impl Strategy<Value = Faces> {
    prop::array::uniform6(letter())
}

fn edge_coords() -> impl Strategy<Value = Coord2> {
    (0..GRID_SIZE, 0..GRID_SIZE).prop_filter("edge cells only", |&coords| Grid::is_edge(coords))
}

fn sorted(mut faces: Faces) -> Faces {
    faces.sort();
    faces
}

proptest! {
    #[test]
    fn four_rolls_bring_a_cube_back(faces in faces(), direction in direction()) {
        let mut cube = Cube::standard(faces, None);
        for _ in 0..4 {
            cube.rotate(direction);
        }
        prop_assert_eq!(cube.faces(), faces);
    }

    #[test]
    fn opposite_roll_undoes_a_roll(faces in faces(), direction in direction()) {
        let mut cube = Cube::standard(faces, None);
        cube.rotate(direction);
        cube.rotate(direction.opposite());
        prop_assert_eq!(cube.faces(), faces);
    }

    #[test]
    fn rolls_keep_the_same_labels(faces in faces(), directions in prop::collection::vec(direction(), 1..12)) {
        let mut cube = Cube::immutable_surface(faces, None);
        for direction in directions {
            cube.rotate(direction);
        }
        prop_assert_eq!(sorted(cube.faces()), sorted(faces));
    }

    #[test]
    fn flip_twice_is_a_no_op(faces in faces()) {
        let mut cube = Cube::standard(faces, None);
        cube.flip();
        prop_assert_eq!(cube.top(), faces[Face::Bottom.index()]);
        cube.flip();
        prop_assert_eq!(cube.faces(), faces);
    }

    #[test]
    fn immutable_surface_ignores_every_stamp(faces in faces(), letter in letter()) {
        let mut cube = Cube::immutable_surface(faces, None);
        cube.stamp_top(letter);
        prop_assert_eq!(cube.faces(), faces);
    }

    #[test]
    fn random_faces_never_repeat_a_letter_three_times(seed in any::<u64>()) {
        use rand::SeedableRng;

        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        let faces = random_faces(&mut rng);
        for letter in Letter::ALL {
            let count = faces.iter().filter(|&&face| face == letter).count();
            prop_assert!(count <= usize::from(MAX_LETTER_REPEATS));
        }
    }

    #[test]
    fn roll_moves_a_contiguous_run_up_to_the_first_lock(
        seed in any::<u64>(),
        start in edge_coords(),
        pick in any::<Index>(),
    ) {
        let before = RandomGridGenerator::new(seed).generate();
        let directions = Grid::available_directions(start);
        let direction = *pick.get(&directions);

        let mut grid = before.clone();
        let outcome = grid.propagate_roll(start, direction);

        let mut line = vec![start];
        while let Some(next) = direction.step(*line.last().unwrap()) {
            line.push(next);
        }
        let run = line
            .iter()
            .take_while(|&&coords| before[coords].can_rotate())
            .count();

        prop_assert_eq!(usize::from(outcome.rolled), run);
        prop_assert_eq!(outcome.stopped_by, line.get(run).copied());
        for coords in Grid::iter_coords() {
            let on_run = line[..run].contains(&coords);
            prop_assert_eq!(grid[coords].was_rolled_this_turn(), on_run);
            if !on_run {
                prop_assert_eq!(grid[coords], before[coords]);
            }
        }
    }

    #[test]
    fn edge_cells_always_have_a_way_in(coords in edge_coords()) {
        let directions = Grid::available_directions(coords);
        let expected = if Grid::is_corner(coords) { 2 } else { 1 };
        prop_assert_eq!(directions.len(), expected);
        for direction in directions {
            prop_assert!(direction.step(coords).is_some());
        }
    }

    #[test]
    fn locations_parse_back(row in 0..GRID_SIZE, col in 0..GRID_SIZE) {
        let text = Location((row, col)).to_string();
        prop_assert_eq!(parse_location(&text), Some((row, col)));
        prop_assert_eq!(parse_location(&text.to_lowercase()), Some((row, col)));
    }
}
