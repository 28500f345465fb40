//! Shader sources for the frame pipeline

/// Neighbor rule and geometry kernel, entry point `main`
pub const HEX_LIFE_SHADER: &str = include_str!("shaders/hex_life.wgsl");

/// Raster pass over the kernel's vertex buffers, entry points `vs_main` / `fs_main`
pub const RENDER_SHADER: &str = include_str!("shaders/render.wgsl");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WORKGROUP_SIZE;

    #[test]
    fn test_kernel_workgroup_size_matches_dispatch() {
        let (x, y, z) = WORKGROUP_SIZE;
        let attribute = format!("@workgroup_size({}, {}, {})", x, y, z);
        assert!(HEX_LIFE_SHADER.contains(&attribute));
    }

    #[test]
    fn test_kernel_declares_all_bindings_in_order() {
        let bindings = [
            "@binding(0) var<storage, read_write> positions",
            "@binding(1) var<storage, read> grid",
            "@binding(2) var<uniform> grid_radius",
            "@binding(3) var<storage, read_write> next_grid",
            "@binding(4) var<uniform> tile_size",
            "@binding(5) var<uniform> screen_size",
            "@binding(6) var<storage, read_write> colors",
        ];
        let mut cursor = 0;
        for binding in bindings {
            let found = HEX_LIFE_SHADER[cursor..]
                .find(binding)
                .unwrap_or_else(|| panic!("missing {}", binding));
            cursor += found + binding.len();
        }
    }

    #[test]
    fn test_render_shader_entry_points() {
        assert!(RENDER_SHADER.contains("fn vs_main"));
        assert!(RENDER_SHADER.contains("fn fs_main"));
        assert!(HEX_LIFE_SHADER.contains("fn main"));
    }
}
