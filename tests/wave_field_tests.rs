use approx::assert_relative_eq;
use cube_wave::{
    linalg::{Mat4, Vec3},
    wave_field::{cell_distance, cell_height, cell_model_matrix, GridCell, GridSize, WaveField, WaveParameters},
};

#[test]
fn test_center_cell_rests_at_min_height() {
    let params = WaveParameters::default();
    let center = GridCell::new(0, 0);
    assert_eq!(cell_distance(center, &params), 0.0);
    assert_eq!(cell_height(center, 0.0, &params), params.min_height);
}

#[test]
fn test_scenario_cell_one_two() {
    let params = WaveParameters::default();
    let cell = GridCell::new(1, 2);

    let distance = cell_distance(cell, &params);
    assert_relative_eq!(distance, 5.0_f32.sqrt() * 0.9, epsilon = 1e-6);
    assert_relative_eq!(distance, 2.0125, epsilon = 1e-4);

    let height = cell_height(cell, 0.0, &params);
    assert_relative_eq!(height, 3.0 * distance.sin() + 5.0, epsilon = 1e-6);
    assert_relative_eq!(height, 7.7121, epsilon = 1e-3);

    let model = cell_model_matrix(cell, 0.0, &params);
    assert_eq!(model.translation(), Vec3::new(1.0, 0.0, 2.0));
    assert_relative_eq!(model[1][1], height, epsilon = 1e-6);
    assert_eq!(model[0][0], 1.0);
    assert_eq!(model[2][2], 1.0);
    assert_eq!(model[3][3], 1.0);
}

#[test]
fn test_height_stays_within_bounds() {
    let params = WaveParameters::default();
    let (low, high) = params.height_bounds();
    assert_eq!((low, high), (2.0, 8.0));

    let field = WaveField::new(GridSize::default(), params);
    for step in 0..200 {
        let t = step as f32 * 0.037;
        for cell in field.cells() {
            let h = cell_height(cell, t, &params);
            assert!(h >= low - 1e-5 && h <= high + 1e-5, "height {} out of range at t={}", h, t);
        }
    }
}

#[test]
fn test_model_matrix_is_deterministic() {
    let params = WaveParameters::default();
    let cell = GridCell::new(-3, 6);
    let first = cell_model_matrix(cell, 12.345, &params);
    for _ in 0..10 {
        let again = cell_model_matrix(cell, 12.345, &params);
        assert_eq!(bytemuck::bytes_of(&first), bytemuck::bytes_of(&again));
    }
}

#[test]
fn test_default_grid_has_225_cells() {
    let grid = GridSize::default();
    assert_eq!(grid.cell_count(), 225);

    let cells: Vec<_> = grid.cells().collect();
    assert_eq!(cells.len(), 225);
    assert_eq!(cells.first(), Some(&GridCell::new(-7, -7)));
    assert_eq!(cells.last(), Some(&GridCell::new(7, 7)));
}

#[test]
fn test_frame_matrices_follow_cell_order() {
    let field = WaveField::new(GridSize::new(3, 4), WaveParameters::default());
    let matrices = field.frame_matrices(0.25);
    let cells: Vec<_> = field.cells().collect();

    assert_eq!(matrices.len(), 12);
    for (matrix, cell) in matrices.iter().zip(&cells) {
        assert_eq!(*matrix, field.model_matrix(*cell, 0.25));
        assert_eq!(
            matrix.translation(),
            Vec3::new(cell.row as f32, 0.0, cell.col as f32)
        );
    }
}

#[test]
fn test_wave_travels_over_time() {
    let params = WaveParameters::default();
    let cell = GridCell::new(2, 2);
    let period = 2.0 * std::f32::consts::PI / params.angular_frequency;

    let h0 = cell_height(cell, 0.0, &params);
    let h_half = cell_height(cell, period / 4.0, &params);
    let h_full = cell_height(cell, period, &params);
    assert_ne!(h0, h_half);
    assert_relative_eq!(h0, h_full, epsilon = 1e-4);
}

#[test]
fn test_inverting_parameters_are_detected() {
    let params = WaveParameters {
        min_height: 1.0,
        height_multiplier: 3.0,
        ..WaveParameters::default()
    };
    assert!(params.validate().is_ok());
    assert!(!params.never_inverts());
    assert!(WaveParameters::default().never_inverts());
}

#[test]
fn test_rejects_non_finite_parameters() {
    let params = WaveParameters {
        angular_frequency: f32::NAN,
        ..WaveParameters::default()
    };
    assert!(params.validate().is_err());

    let params = WaveParameters {
        height_multiplier: -1.0,
        ..WaveParameters::default()
    };
    assert!(params.validate().is_err());
}

#[test]
fn test_identity_grid_cell_matrix() {
    let params = WaveParameters {
        height_multiplier: 0.0,
        min_height: 1.0,
        ..WaveParameters::default()
    };
    assert_eq!(cell_model_matrix(GridCell::new(0, 0), 3.0, &params), Mat4::IDENTITY);
}

#[test]
fn test_oversized_grid_ranges_do_not_overflow() {
    let grid = GridSize::new(3_000_000_000, 1);
    assert!(!grid.is_within_limits());

    let rows = grid.row_range();
    assert_eq!(rows.start, -(i32::MAX / 2));
    assert!(rows.end > 0);
    assert_eq!(grid.cells().next(), Some(GridCell::new(rows.start, 0)));
}

#[test]
fn test_grid_limits() {
    assert!(GridSize::default().is_within_limits());
    assert!(GridSize::new(1024, 1).is_within_limits());
    assert!(!GridSize::new(1025, 1).is_within_limits());
    assert!(!GridSize::new(0, 15).is_within_limits());
}
