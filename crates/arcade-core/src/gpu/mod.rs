//! GPU command processor: register file, one-shot command decode, and the
//! matrix stack feeding the raster pipeline.
//!
//! The command processor is armed by a word write to the control register
//! with the strobe bit set. The command executes synchronously inside that
//! write — the strobe is edge-triggered, firing exactly once per arming
//! write, and both the busy flag and the strobe bit are clear again before
//! the write returns.

/// 4×4 matrix type and constructors.
pub mod matrix;
/// Vertex transform, clip, and barycentric rasterization.
pub mod raster;

use crate::memory::read_u32_be;
use crate::{DiagCounters, DiagEvent};
use self::matrix::Mat4;
use self::raster::{render_triangle, FrameBuffers, Triangle, Vertex};

/// Offset of the control register.
pub const GPU_REG_CONTROL: u32 = 0x00;
/// Offset of the vertex-buffer pointer register.
pub const GPU_REG_VERTEX_BUFFER: u32 = 0x04;
/// Offset of the index-buffer pointer register.
pub const GPU_REG_INDEX_BUFFER: u32 = 0x08;
/// Offset of the texture-base pointer register.
pub const GPU_REG_TEXTURE_BASE: u32 = 0x0C;

/// Control-register strobe bit: set by the CPU to fire one command.
pub const CONTROL_STROBE_BIT: u32 = 0x0000_0001;
/// Shift of the command opcode field in the control register.
pub const CONTROL_COMMAND_SHIFT: u32 = 8;
/// Mask of the command opcode field after shifting.
pub const CONTROL_COMMAND_MASK: u32 = 0xFF;

/// Depth of the bounded matrix stack.
pub const MATRIX_STACK_DEPTH: usize = 32;

/// Bytes per vertex record in the draw stream (9 floats).
const VERTEX_RECORD_BYTES: u32 = 36;

/// Assigned command opcodes carried in control-register bits 8–15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GpuCommand {
    /// Zero the color plane and reset the depth plane.
    Clear = 0x01,
    /// Decode one triangle from the vertex-buffer pointer and render it.
    DrawTriangle = 0x02,
    /// Load the current matrix from the vertex-buffer pointer.
    SetMatrix = 0x03,
    /// Copy the current matrix onto the bounded stack.
    PushMatrix = 0x04,
    /// Restore the current matrix from the bounded stack.
    PopMatrix = 0x05,
    /// Reset the current matrix to identity.
    LoadIdentity = 0x06,
    /// Compose the current matrix with a 4×4 read from the index-buffer
    /// pointer.
    Multiply = 0x07,
    /// Compose with a translation; x, y, z at the index-buffer pointer.
    Translate = 0x08,
    /// Compose with an X rotation; angle (radians) at the index-buffer
    /// pointer.
    RotateX = 0x09,
    /// Compose with a Y rotation.
    RotateY = 0x0A,
    /// Compose with a Z rotation.
    RotateZ = 0x0B,
}

impl GpuCommand {
    /// Decodes a command opcode, or `None` for an unassigned value.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Clear),
            0x02 => Some(Self::DrawTriangle),
            0x03 => Some(Self::SetMatrix),
            0x04 => Some(Self::PushMatrix),
            0x05 => Some(Self::PopMatrix),
            0x06 => Some(Self::LoadIdentity),
            0x07 => Some(Self::Multiply),
            0x08 => Some(Self::Translate),
            0x09 => Some(Self::RotateX),
            0x0A => Some(Self::RotateY),
            0x0B => Some(Self::RotateZ),
            _ => None,
        }
    }
}

/// The GPU coprocessor state: register file, matrix stack, and render
/// targets. Owned by the session's bus and driven only through register
/// writes.
#[derive(Debug, Clone)]
pub struct Gpu {
    control: u32,
    vertex_buffer: u32,
    index_buffer: u32,
    texture_base: u32,
    current: Mat4,
    projection: Mat4,
    matrix_stack: [Mat4; MATRIX_STACK_DEPTH],
    matrix_top: usize,
    busy: bool,
    frame: FrameBuffers,
}

impl Default for Gpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpu {
    /// Creates a powered-on GPU: registers zero, matrices identity, frame
    /// cleared.
    #[must_use]
    pub fn new() -> Self {
        Self {
            control: 0,
            vertex_buffer: 0,
            index_buffer: 0,
            texture_base: 0,
            current: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            matrix_stack: [Mat4::IDENTITY; MATRIX_STACK_DEPTH],
            matrix_top: 0,
            busy: false,
            frame: FrameBuffers::new(),
        }
    }

    /// Restores power-on state, including cleared render targets.
    pub fn reset(&mut self) {
        self.control = 0;
        self.vertex_buffer = 0;
        self.index_buffer = 0;
        self.texture_base = 0;
        self.current = Mat4::IDENTITY;
        self.projection = Mat4::IDENTITY;
        self.matrix_stack = [Mat4::IDENTITY; MATRIX_STACK_DEPTH];
        self.matrix_top = 0;
        self.busy = false;
        self.frame.clear();
    }

    /// Reads one register in the window. Unassigned offsets read 0 and
    /// record a diagnostic.
    pub fn read_register(&self, offset: u32, diag: &mut DiagCounters) -> u32 {
        match offset {
            GPU_REG_CONTROL => self.control,
            GPU_REG_VERTEX_BUFFER => self.vertex_buffer,
            GPU_REG_INDEX_BUFFER => self.index_buffer,
            GPU_REG_TEXTURE_BASE => self.texture_base,
            _ => {
                diag.record(DiagEvent::UnknownGpuRegister);
                0
            }
        }
    }

    /// Writes one register in the window. A control write with the strobe
    /// bit set executes the encoded command synchronously against `ram`
    /// before returning, then clears busy and the strobe bit.
    pub fn write_register(&mut self, offset: u32, value: u32, ram: &[u8], diag: &mut DiagCounters) {
        match offset {
            GPU_REG_CONTROL => {
                self.control = value;
                if value & CONTROL_STROBE_BIT != 0 {
                    self.busy = true;
                    self.execute_command(ram, diag);
                    self.busy = false;
                    self.control &= !CONTROL_STROBE_BIT;
                }
            }
            GPU_REG_VERTEX_BUFFER => self.vertex_buffer = value,
            GPU_REG_INDEX_BUFFER => self.index_buffer = value,
            GPU_REG_TEXTURE_BASE => self.texture_base = value,
            _ => diag.record(DiagEvent::UnknownGpuRegister),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn execute_command(&mut self, ram: &[u8], diag: &mut DiagCounters) {
        let opcode = ((self.control >> CONTROL_COMMAND_SHIFT) & CONTROL_COMMAND_MASK) as u8;
        let Some(command) = GpuCommand::from_u8(opcode) else {
            diag.record(DiagEvent::UnknownGpuCommand);
            return;
        };

        match command {
            GpuCommand::Clear => self.frame.clear(),
            GpuCommand::DrawTriangle => {
                let triangle = decode_triangle(ram, self.vertex_buffer);
                render_triangle(&mut self.frame, &self.current, &self.projection, triangle);
            }
            GpuCommand::SetMatrix => self.current = read_matrix(ram, self.vertex_buffer),
            GpuCommand::PushMatrix => {
                if self.matrix_top < MATRIX_STACK_DEPTH {
                    self.matrix_stack[self.matrix_top] = self.current;
                    self.matrix_top += 1;
                } else {
                    diag.record(DiagEvent::MatrixStackOverflow);
                }
            }
            GpuCommand::PopMatrix => {
                if self.matrix_top > 0 {
                    self.matrix_top -= 1;
                    self.current = self.matrix_stack[self.matrix_top];
                } else {
                    diag.record(DiagEvent::MatrixStackUnderflow);
                }
            }
            GpuCommand::LoadIdentity => self.current = Mat4::IDENTITY,
            GpuCommand::Multiply => {
                let factor = read_matrix(ram, self.index_buffer);
                self.current = self.current.multiply(&factor);
            }
            GpuCommand::Translate => {
                let x = read_f32(ram, self.index_buffer);
                let y = read_f32(ram, self.index_buffer.wrapping_add(4));
                let z = read_f32(ram, self.index_buffer.wrapping_add(8));
                self.current = self.current.multiply(&Mat4::translation(x, y, z));
            }
            GpuCommand::RotateX => {
                let angle = read_f32(ram, self.index_buffer);
                self.current = self.current.multiply(&Mat4::rotation_x(angle));
            }
            GpuCommand::RotateY => {
                let angle = read_f32(ram, self.index_buffer);
                self.current = self.current.multiply(&Mat4::rotation_y(angle));
            }
            GpuCommand::RotateZ => {
                let angle = read_f32(ram, self.index_buffer);
                self.current = self.current.multiply(&Mat4::rotation_z(angle));
            }
        }
    }

    /// Packed RGBA8 color plane, valid to read between ticks.
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        self.frame.color()
    }

    /// Depth plane, valid to read between ticks.
    #[must_use]
    pub fn depth_buffer(&self) -> &[f32] {
        self.frame.depth()
    }

    /// The current (model-view) matrix.
    #[must_use]
    pub const fn current_matrix(&self) -> Mat4 {
        self.current
    }

    /// The projection matrix applied after the model-view stage.
    #[must_use]
    pub const fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Installs a projection matrix. There is no command for this; the
    /// host configures it directly, identity by default.
    pub const fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Number of matrices currently saved on the stack.
    #[must_use]
    pub const fn matrix_depth(&self) -> usize {
        self.matrix_top
    }

    /// `true` only while a command is executing; always `false` between
    /// ticks because commands complete synchronously.
    #[must_use]
    pub const fn busy(&self) -> bool {
        self.busy
    }
}

/// Reads a float from RAM as an explicit bit-pattern conversion of a
/// big-endian word. Out-of-range reads yield 0.0.
fn read_f32(ram: &[u8], addr: u32) -> f32 {
    f32::from_bits(read_u32_be(ram, addr))
}

/// Reads a row-major 4×4 float matrix from RAM.
fn read_matrix(ram: &[u8], addr: u32) -> Mat4 {
    let mut rows = [[0.0_f32; 4]; 4];
    let mut element = 0_u32;
    for row in &mut rows {
        for cell in row {
            *cell = read_f32(ram, addr.wrapping_add(element * 4));
            element += 1;
        }
    }
    Mat4::from_rows(rows)
}

/// Decodes one triangle record (3 vertices × 9 floats:
/// x, y, z, r, g, b, a, u, v) from RAM at `addr`.
fn decode_triangle(ram: &[u8], addr: u32) -> Triangle {
    let mut vertices = [Vertex::default(); 3];
    let mut base = addr;
    for vertex in &mut vertices {
        let field = |slot: u32| read_f32(ram, base.wrapping_add(slot * 4));
        *vertex = Vertex {
            x: field(0),
            y: field(1),
            z: field(2),
            r: field(3),
            g: field(4),
            b: field(5),
            a: field(6),
            u: field(7),
            v: field(8),
        };
        base = base.wrapping_add(VERTEX_RECORD_BYTES);
    }
    Triangle { vertices }
}
