use std::io::{BufReader, Cursor};

use wgpu::util::DeviceExt;

use crate::{
    data_structures::model::{Mesh, ModelVertex},
    resources::LoadError,
};

/// Geometry parsed from a file, not yet on the GPU.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl ModelData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Parses an OBJ document into one indexed mesh.
///
/// Faces are triangulated and every shape of the file is merged, so a model
/// is always one vertex and one index buffer. Materials referenced by the
/// file are ignored, models get their texture from the caller. Texture
/// coordinates are flipped vertically to match wgpu's origin.
pub fn parse_obj(name: &str, text: &str) -> Result<ModelData, LoadError> {
    let mut reader = BufReader::new(Cursor::new(text));
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )
    .map_err(|source| LoadError::Obj {
        name: name.to_string(),
        source,
    })?;

    let mut data = ModelData::default();
    for m in models {
        let base = data.vertices.len() as u32;
        let mesh = m.mesh;
        data.vertices
            .extend((0..mesh.positions.len() / 3).map(|i| ModelVertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                tex_coords: [
                    mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                normal: [
                    mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
            }));
        data.indices
            .extend(mesh.indices.iter().map(|index| index + base));
    }
    Ok(data)
}

pub fn upload_mesh(
    device: &wgpu::Device,
    name: &str,
    vertices: &[ModelVertex],
    indices: &[u32],
) -> Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
o quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quads_are_triangulated_and_uvs_flipped() {
        let data = parse_obj("quad.obj", QUAD).unwrap();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.indices.len(), 6);
        let first = data.vertices[data.indices[0] as usize];
        assert_eq!(first.position, [0.0, 0.0, 0.0]);
        assert_eq!(first.tex_coords, [0.0, 1.0]);
        assert_eq!(first.normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn shapes_are_merged_into_one_mesh() {
        let two = "\
o a
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o b
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let data = parse_obj("two.obj", two).unwrap();
        assert_eq!(data.vertices.len(), 6);
        assert_eq!(data.indices.len(), 6);
        assert!(data.indices[3..].iter().all(|&i| i >= 3));
        // Missing normals and uvs default to zero.
        assert_eq!(data.vertices[0].normal, [0.0; 3]);
        assert_eq!(data.vertices[0].tex_coords, [0.0, 1.0]);
    }

    #[test]
    fn a_file_without_faces_is_empty() {
        let data = parse_obj("points.obj", "v 0 0 0\n").unwrap();
        assert!(data.is_empty());
    }
}
