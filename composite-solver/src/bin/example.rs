//! Composite Solver Example - Carbon/Epoxy Laminate

use composite_solver::prelude::*;

fn print_matrix(name: &str, rows: &[Vec<f64>]) {
    println!("{name}:");
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>12.4e}")).collect();
        println!("  [{}]", cells.join(" "));
    }
}

fn print_constants(label: &str, c: &EngineeringConstantsResult) {
    println!(
        "  {label:<10} Ex = {:>10.1}  Ey = {:>10.1}  Gxy = {:>9.1}  nu_xy = {:.4}  eta_1 = {:>8.4}  eta_2 = {:>8.4}",
        c.e1, c.e2, c.g12, c.nu12, c.eta_1, c.eta_2
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Composite Solver Example: Carbon/Epoxy ===\n");

    // Ply constants in MPa, thickness in mm
    let conventions = Conventions::v2();

    // Single lamina at 45 degrees
    let lamina = compute_lamina_engineering_constants(
        &LaminaInput {
            e1: 150_000.0,
            e2: 10_000.0,
            g12: 5_000.0,
            nu12: 0.3,
            layup_angle: 45.0,
        },
        &conventions,
    )?;
    println!("--- Lamina at {} deg ---", lamina.angle.as_degrees());
    print_constants("lamina", &lamina.constants);
    print_matrix("Q-bar", &lamina.stiffness.rows());
    println!();

    // Quasi-isotropic laminate from a layup code
    let stack = StackInput::Uniform(LaminateInput {
        material: PlyMaterialInput {
            e1: 150_000.0,
            e2: 10_000.0,
            g12: 5_000.0,
            nu12: 0.3,
            nu23: Some(0.25),
            density: Some(1.6e-9),
        },
        layup_sequence: "[0/45/-45/90]s".to_string(),
        layer_thickness: 0.125,
    });

    let plate = compute_laminate_plate_properties(&stack, &conventions)?;
    println!(
        "--- Plate: {} plies, h = {} mm ---",
        plate.abd.num_plies, plate.abd.thickness
    );
    print_matrix("A", &composite_solver::math::to_rows(&plate.abd.a));
    print_matrix("B", &composite_solver::math::to_rows(&plate.abd.b));
    print_matrix("D", &composite_solver::math::to_rows(&plate.abd.d));
    print_constants("in-plane", &plate.in_plane);
    print_constants("flexural", &plate.flexural);
    println!();

    for rule in [HomogenizationRule::Voigt, HomogenizationRule::Laminate] {
        let solid = compute_laminate_3d_properties(&stack, &conventions.with_homogenization(rule))?;
        let c = solid.constants;
        println!("--- 3D properties ({rule:?} rule) ---");
        println!(
            "  E1 = {:.1}  E2 = {:.1}  E3 = {:.1}  G12 = {:.1}  G13 = {:.1}  G23 = {:.1}",
            c.e1, c.e2, c.e3, c.g12, c.g13, c.g23
        );
        println!(
            "  nu12 = {:.4}  nu13 = {:.4}  nu23 = {:.4}",
            c.nu12, c.nu13, c.nu23
        );
    }
    println!();

    // Micromechanics
    let udfrc = UdfrcInput {
        fiber_E1: 230_000.0,
        fiber_E2: 15_000.0,
        fiber_G12: 15_000.0,
        fiber_nu12: 0.2,
        fiber_nu23: 0.07,
        matrix_E1: 3_500.0,
        matrix_nu: 0.35,
        fiber_volume_fraction: 0.6,
        fiber_density: Some(1.8e-9),
        matrix_density: Some(1.2e-9),
    };
    println!("--- UDFRC at Vf = {} ---", udfrc.fiber_volume_fraction);
    let results = compute_udfrc_models(
        &udfrc,
        &ApiVersion::V2.micromechanics_models(),
        conventions.conditioning_tolerance,
    )?;
    for p in &results {
        let c = p.constants;
        println!(
            "  {:<12} E1 = {:>9.1}  E2 = {:>8.1}  G12 = {:>7.1}  G23 = {:>7.1}  nu12 = {:.4}  nu23 = {:.4}",
            p.model.name(),
            c.e1,
            c.e2,
            c.g12,
            c.g23,
            c.nu12,
            c.nu23
        );
    }
    if let Some(rho) = results.first().and_then(|p| p.material.density()) {
        println!("  density = {rho:.3e}");
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
