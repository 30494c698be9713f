//! A [`GraphicsContext`] that records calls instead of touching a GPU.
//!
//! It enforces the same ownership and binding rules as the wgpu context,
//! which makes it suitable for exercising the frame loop headlessly.

use std::collections::{HashMap, HashSet};

use crate::{
    context::{GeometryId, GraphicsContext, ProgramId, ShaderId, ShaderStage, UniformLocation},
    error::{RenderError, SetupError},
    geometry::{CubeVertex, VertexLayout},
    linalg::Mat4,
    shaders::{ShaderInterface, UniformSlot},
};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Viewport(u32, u32),
    Clear,
    CreateGeometry { geometry: GeometryId, vertex_count: usize },
    BindGeometry(GeometryId),
    UnbindGeometry,
    DestroyGeometry(GeometryId),
    CompileShader { shader: ShaderId, stage: ShaderStage },
    DeleteShader(ShaderId),
    LinkProgram(ProgramId),
    UseProgram(ProgramId),
    SetMat4 { location: UniformLocation, matrix: Mat4 },
    Draw { vertex_count: u32 },
    DestroyProgram(ProgramId),
    Present,
}

struct RecordedProgram {
    uniforms: Vec<(String, UniformSlot)>,
}

pub struct RecordingContext {
    size: (u32, u32),
    next_id: u32,
    commands: Vec<Command>,
    shaders: HashMap<ShaderId, (ShaderStage, ShaderInterface)>,
    programs: HashMap<ProgramId, RecordedProgram>,
    geometries: HashMap<GeometryId, u32>,
    released_geometries: HashSet<GeometryId>,
    active_program: Option<ProgramId>,
    bound_geometry: Option<GeometryId>,
    fail_stage: Option<ShaderStage>,
    fail_link: bool,
    fail_geometry_destroy: bool,
}

impl RecordingContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            next_id: 1,
            commands: Vec::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            geometries: HashMap::new(),
            released_geometries: HashSet::new(),
            active_program: None,
            bound_geometry: None,
            fail_stage: None,
            fail_link: false,
            fail_geometry_destroy: false,
        }
    }

    /// Makes every compile of `stage` fail.
    pub fn failing_compile(mut self, stage: ShaderStage) -> Self {
        self.fail_stage = Some(stage);
        self
    }

    pub fn failing_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    /// Makes `destroy_geometry` fail and leave the geometry live, as a lost
    /// device would.
    pub fn failing_geometry_destroy(mut self) -> Self {
        self.fail_geometry_destroy = true;
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn live_geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn live_shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn bound_geometry(&self) -> Option<GeometryId> {
        self.bound_geometry
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .count()
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_geometry(&self, geometry: GeometryId) -> Result<u32, RenderError> {
        match self.geometries.get(&geometry) {
            Some(&count) => Ok(count),
            None if self.released_geometries.contains(&geometry) => Err(RenderError::ResourceMisuse(
                format!("geometry {:?} used after destroy", geometry),
            )),
            None => Err(RenderError::DeadGeometry(geometry)),
        }
    }
}

impl GraphicsContext for RecordingContext {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn viewport(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.commands.push(Command::Viewport(width, height));
    }

    fn clear(&mut self, _color: wgpu::Color) -> Result<(), RenderError> {
        self.commands.push(Command::Clear);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if let Some(geometry) = self.bound_geometry {
            return Err(RenderError::ResourceMisuse(format!(
                "geometry {:?} still bound at end of frame",
                geometry
            )));
        }
        self.commands.push(Command::Present);
        Ok(())
    }

    fn create_geometry(
        &mut self,
        vertices: &[CubeVertex],
        layout: &VertexLayout,
    ) -> Result<GeometryId, SetupError> {
        if layout.array_stride as usize != std::mem::size_of::<CubeVertex>() {
            return Err(SetupError::Geometry(format!(
                "layout stride {} does not match vertex size",
                layout.array_stride
            )));
        }
        let geometry = GeometryId(self.allocate_id());
        self.geometries.insert(geometry, vertices.len() as u32);
        self.commands.push(Command::CreateGeometry {
            geometry,
            vertex_count: vertices.len(),
        });
        Ok(geometry)
    }

    fn bind_geometry(&mut self, geometry: GeometryId) -> Result<(), RenderError> {
        self.check_geometry(geometry)?;
        self.bound_geometry = Some(geometry);
        self.commands.push(Command::BindGeometry(geometry));
        Ok(())
    }

    fn unbind_geometry(&mut self) {
        self.bound_geometry = None;
        self.commands.push(Command::UnbindGeometry);
    }

    fn destroy_geometry(&mut self, geometry: GeometryId) -> Result<(), RenderError> {
        self.check_geometry(geometry)?;
        if self.fail_geometry_destroy {
            return Err(RenderError::Surface("device lost while releasing geometry".into()));
        }
        self.geometries.remove(&geometry);
        self.released_geometries.insert(geometry);
        if self.bound_geometry == Some(geometry) {
            self.bound_geometry = None;
        }
        self.commands.push(Command::DestroyGeometry(geometry));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32) -> Result<(), RenderError> {
        let program = self
            .active_program
            .ok_or_else(|| RenderError::ResourceMisuse("draw without a program in use".into()))?;
        if !self.programs.contains_key(&program) {
            return Err(RenderError::DeadProgram(program));
        }
        let geometry = self
            .bound_geometry
            .ok_or_else(|| RenderError::ResourceMisuse("draw without bound geometry".into()))?;
        let available = self.check_geometry(geometry)?;
        if vertex_count > available {
            return Err(RenderError::ResourceMisuse(format!(
                "draw of {} vertices from geometry holding {}",
                vertex_count, available
            )));
        }
        self.commands.push(Command::Draw { vertex_count });
        Ok(())
    }

    fn compile_shader(&mut self, source: &str, stage: ShaderStage) -> Result<ShaderId, SetupError> {
        if self.fail_stage == Some(stage) {
            return Err(SetupError::ShaderCompile {
                stage,
                message: "rejected by recording context".into(),
            });
        }
        let shader = ShaderId(self.allocate_id());
        self.shaders.insert(shader, (stage, ShaderInterface::reflect(source)));
        self.commands.push(Command::CompileShader { shader, stage });
        Ok(shader)
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
        self.commands.push(Command::DeleteShader(shader));
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, SetupError> {
        if self.fail_link {
            return Err(SetupError::ProgramLink("rejected by recording context".into()));
        }
        let interface = match (self.shaders.get(&vertex), self.shaders.get(&fragment)) {
            (Some((ShaderStage::Vertex, interface)), Some((ShaderStage::Fragment, _))) => interface.clone(),
            _ => {
                return Err(SetupError::ProgramLink(format!(
                    "{:?} and {:?} are not a vertex/fragment pair",
                    vertex, fragment
                )))
            }
        };

        let program = ProgramId(self.allocate_id());
        self.programs.insert(
            program,
            RecordedProgram {
                uniforms: interface.uniform_slots(),
            },
        );
        self.commands.push(Command::LinkProgram(program));
        Ok(program)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs
            .get(&program)?
            .uniforms
            .iter()
            .position(|(uniform, _)| uniform == name)
            .map(|index| UniformLocation(index as u32))
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), RenderError> {
        if !self.programs.contains_key(&program) {
            return Err(RenderError::DeadProgram(program));
        }
        self.active_program = Some(program);
        self.commands.push(Command::UseProgram(program));
        Ok(())
    }

    fn set_mat4(&mut self, location: UniformLocation, matrix: &Mat4) -> Result<(), RenderError> {
        let program = self
            .active_program
            .ok_or_else(|| RenderError::ResourceMisuse("uniform upload without a program in use".into()))?;
        let known = self
            .programs
            .get(&program)
            .ok_or(RenderError::DeadProgram(program))?
            .uniforms
            .len();
        if location.0 as usize >= known {
            return Err(RenderError::UnknownUniform(location.0));
        }
        self.commands.push(Command::SetMat4 {
            location,
            matrix: *matrix,
        });
        Ok(())
    }

    fn destroy_program(&mut self, program: ProgramId) -> Result<(), RenderError> {
        if self.programs.remove(&program).is_none() {
            return Err(RenderError::DeadProgram(program));
        }
        if self.active_program == Some(program) {
            self.active_program = None;
        }
        self.commands.push(Command::DestroyProgram(program));
        Ok(())
    }
}
