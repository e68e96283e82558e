use housegen::{Building, CellKind, GenerationError, HouseConfig, audit, generate};
use proptest::prelude::*;

fn house_config() -> impl Strategy<Value = HouseConfig> {
    (2..=6i32, 0..=20i32, 0..=20i32, 1..=4i32, any::<u64>()).prop_map(
        |(min_room_size, extra_width, extra_depth, floor_count, seed)| {
            HouseConfig {
                width: 2 * min_room_size + extra_width,
                depth: 2 * min_room_size + extra_depth,
                floor_count,
                min_room_size,
                ..HouseConfig::default()
            }
            .with_seed(seed)
        },
    )
}

/// Runs generation, treating a stack whose upper floors have no clear 2x2
/// spot left as a rejected case rather than a failure.
fn generate_or_reject(config: &HouseConfig) -> Result<Building, TestCaseError> {
    match generate(config) {
        Ok(building) => Ok(building),
        Err(GenerationError::StairPlacementImpossible { lower_level }) => {
            Err(TestCaseError::reject(format!("no stair spot above floor {lower_level}")))
        }
        Err(err) => Err(TestCaseError::fail(format!("{config:?}: {err}"))),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_buildings_hold_every_invariant(config in house_config()) {
        let building = generate_or_reject(&config)?;
        prop_assert_eq!(building.floors().len(), config.floor_count as usize);
        prop_assert_eq!(audit(&building, config.min_room_size), Ok(()));
    }

    #[test]
    fn stair_cells_match_stair_links(config in house_config()) {
        let building = generate_or_reject(&config)?;
        for floor in building.floors() {
            let expected = if floor.level() + 1 < building.floors().len() { 4 } else { 0 };
            prop_assert_eq!(floor.count_cells(CellKind::Stair), expected);
        }
    }
}
