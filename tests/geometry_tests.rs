use cube_wave::{
    context::{build_program, GraphicsContext},
    geometry::{unit_cube, GeometryResource, CUBE_VERTEX_COUNT},
    recording::RecordingContext,
    shaders::{ShaderSources, UniformLayout},
    RenderError, SetupError,
};

fn context_with_program() -> RecordingContext {
    let mut ctx = RecordingContext::new(800, 600);
    let sources = ShaderSources::embedded(UniformLayout::Combined);
    let program = build_program(&mut ctx, &sources.vertex, &sources.fragment).unwrap();
    ctx.use_program(program).unwrap();
    ctx
}

#[test]
fn test_unit_cube_shape() {
    let cube = unit_cube();
    assert_eq!(cube.len(), CUBE_VERTEX_COUNT as usize);

    for face in cube.chunks(6) {
        let color = face[0].color;
        assert!(face.iter().all(|v| v.color == color), "face must be a single color");

        // Every face lies on one axis-aligned plane at +-0.5.
        let on_plane = (0..3).any(|axis| {
            let value = face[0].position[axis];
            value.abs() == 0.5 && face.iter().all(|v| v.position[axis] == value)
        });
        assert!(on_plane);
    }

    for v in &cube {
        assert!(v.position.iter().all(|c| c.abs() == 0.5));
    }
}

#[test]
fn test_create_uploads_once() {
    let mut ctx = RecordingContext::new(800, 600);
    let geometry = GeometryResource::create(&mut ctx, &unit_cube()).unwrap();
    assert_eq!(geometry.vertex_count(), 36);
    assert_eq!(ctx.live_geometry_count(), 1);
}

#[test]
fn test_create_rejects_empty_vertices() {
    let mut ctx = RecordingContext::new(800, 600);
    let result = GeometryResource::create(&mut ctx, &[]);
    assert!(matches!(result, Err(SetupError::Geometry(_))));
    assert_eq!(ctx.live_geometry_count(), 0);
}

#[test]
fn test_bind_draw_unbind() {
    let mut ctx = context_with_program();
    let geometry = GeometryResource::create(&mut ctx, &unit_cube()).unwrap();

    geometry.bind(&mut ctx).unwrap();
    assert_eq!(ctx.bound_geometry(), Some(geometry.id()));
    geometry.draw(&mut ctx).unwrap();
    GeometryResource::unbind(&mut ctx);

    assert_eq!(ctx.bound_geometry(), None);
    assert_eq!(ctx.draw_count(), 1);
}

#[test]
fn test_bind_after_destroy_is_misuse() {
    let mut ctx = context_with_program();
    let geometry = GeometryResource::create(&mut ctx, &unit_cube()).unwrap();
    let id = geometry.id();

    geometry.destroy(&mut ctx).unwrap();
    assert_eq!(ctx.live_geometry_count(), 0);

    let err = ctx.bind_geometry(id).unwrap_err();
    assert!(matches!(err, RenderError::ResourceMisuse(_)));
    assert!(err.is_misuse());
}

#[test]
fn test_draw_after_destroy_is_misuse() {
    let mut ctx = context_with_program();
    let geometry = GeometryResource::create(&mut ctx, &unit_cube()).unwrap();
    geometry.bind(&mut ctx).unwrap();
    geometry.destroy(&mut ctx).unwrap();

    let err = ctx.draw(CUBE_VERTEX_COUNT).unwrap_err();
    assert!(matches!(err, RenderError::ResourceMisuse(_)));
}

#[test]
fn test_double_destroy_is_misuse() {
    let mut ctx = RecordingContext::new(800, 600);
    let geometry = GeometryResource::create(&mut ctx, &unit_cube()).unwrap();
    let id = geometry.id();
    geometry.destroy(&mut ctx).unwrap();

    let err = ctx.destroy_geometry(id).unwrap_err();
    assert!(matches!(err, RenderError::ResourceMisuse(_)));
}

#[test]
fn test_draw_without_binding_is_misuse() {
    let mut ctx = context_with_program();
    let _geometry = GeometryResource::create(&mut ctx, &unit_cube()).unwrap();
    assert!(ctx.draw(CUBE_VERTEX_COUNT).unwrap_err().is_misuse());
}

#[test]
fn test_present_with_bound_geometry_is_misuse() {
    let mut ctx = context_with_program();
    let geometry = GeometryResource::create(&mut ctx, &unit_cube()).unwrap();
    geometry.bind(&mut ctx).unwrap();
    assert!(ctx.present().unwrap_err().is_misuse());

    GeometryResource::unbind(&mut ctx);
    assert!(ctx.present().is_ok());
}
