//! Whole-file decoding of synthetic VIF streams

use glam::{Vec2, Vec3};
use pretty_assertions::assert_eq;
use snow_data::ByteRegion;
use snow_vif::{BoneInfluence, Error, StreamStop, UvScale, decode_vif};

const REGS: u16 = 3;

#[derive(Default)]
struct Stream {
    bytes: Vec<u8>,
}

impl Stream {
    fn code(&mut self, command: u8, num: u8, immediate: u16) -> &mut Self {
        self.bytes.extend(immediate.to_le_bytes());
        self.bytes.extend([num, command]);
        self
    }

    fn align(&mut self) {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
    }

    fn mscal(&mut self) -> &mut Self {
        self.code(0x14, 0, 66)
    }

    fn strip_tag(&mut self, slots: u16, prim: u64) -> &mut Self {
        self.code(0x6C, 1, 0);
        let low = u64::from(slots) | (prim << 47) | (u64::from(REGS) << 60);
        self.bytes.extend(low.to_le_bytes());
        self.bytes.extend(0x512u64.to_le_bytes());
        self
    }

    fn vertices(&mut self, vertices: &[[i16; 3]]) -> &mut Self {
        self.code(0x69, vertices.len() as u8, 0);
        for v in vertices {
            v.iter().for_each(|c| self.bytes.extend(c.to_le_bytes()));
        }
        self.align();
        self
    }

    fn normals(&mut self, count: usize) -> &mut Self {
        self.code(0x6A, count as u8, 0);
        for _ in 0..count {
            self.bytes.extend([0, 127, 0]);
        }
        self.align();
        self
    }

    /// Two leading records, then one record per slot writing vertex k to
    /// slot k; `copy` adds a record copying slot `.0` into slot `.1`
    fn records(&mut self, slots: u16, skip: Option<u16>, copy: Option<(u16, u16)>) -> &mut Self {
        let mut records = vec![[0x1FFu16; 3]; 2];
        for k in 0..slots {
            let flag = if Some(k) == skip { 0x8000 } else { 0 };
            records.push([k * REGS | flag, 0x1FF, 0x1FF]);
        }
        if let Some((from, to)) = copy {
            records.push([0x1FF, from * REGS, to * REGS]);
        }
        self.code(0x69, records.len() as u8, 0x4000);
        for r in &records {
            r.iter().for_each(|c| self.bytes.extend(c.to_le_bytes()));
        }
        self.align();
        self
    }

    fn uvs(&mut self, uvs: &[[i16; 2]]) -> &mut Self {
        self.code(0x65, uvs.len() as u8, 0);
        for uv in uvs {
            uv.iter().for_each(|c| self.bytes.extend(c.to_le_bytes()));
        }
        self
    }

    fn weights(&mut self, records: &[[u8; 4]]) -> &mut Self {
        self.code(0x6E, records.len() as u8, 0);
        records.iter().for_each(|r| self.bytes.extend(r));
        self
    }
}

fn vif_file(streams: &[&Stream]) -> Vec<u8> {
    let mut data = vec![0u8; 0x40 + streams.len() * 4];
    data[0x12] = streams.len() as u8;
    let mut offset = data.len();
    for (i, stream) in streams.iter().enumerate() {
        data[0x28 + i * 4..0x2C + i * 4].copy_from_slice(&(offset as u32).to_le_bytes());
        offset += stream.bytes.len();
    }
    let end = 0x28 + streams.len() * 4;
    data[end..end + 4].copy_from_slice(&(offset as u32).to_le_bytes());
    for stream in streams {
        data.extend(&stream.bytes);
    }
    data
}

fn five_slot_chunk(stream: &mut Stream, prim: u64) {
    stream
        .strip_tag(5, prim)
        .vertices(&[[0, 0, 0], [16, 0, 0], [0, 16, 0], [16, 16, 0], [32, 0, 16]])
        .normals(5)
        .records(5, Some(3), None)
        .mscal()
        .uvs(&[[0, 0], [16, 0], [0, 16], [16, 16], [32, 0]]);
}

#[test]
fn test_skip_flag_strip() {
    let mut stream = Stream::default();
    five_slot_chunk(&mut stream, 4);
    let data = vif_file(&[&stream]);

    let model = decode_vif(&ByteRegion::whole(&data), UvScale::TEXELS).unwrap();
    assert_eq!(model.header().mesh_count, 1);
    let decoded = &model.meshes()[0];
    assert_eq!(decoded.stop, StreamStop::Completed);
    assert_eq!(decoded.chunk_count, 1);

    let mesh = decoded.mesh.as_ref().unwrap();
    assert_eq!(mesh.triangles, [[0, 1, 2], [2, 3, 4]]);
    assert_eq!(mesh.vertex_count(), 5);
    assert_eq!(mesh.positions[4], Vec3::new(2.0, 0.0, 1.0));
    assert_eq!(mesh.normals[0], Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(mesh.uvs[3], Some(Vec2::new(1.0, 1.0)));
    assert!(!mesh.is_skinned());
}

#[test]
fn test_two_slot_strip_has_no_triangles() {
    let mut stream = Stream::default();
    stream
        .strip_tag(2, 4)
        .vertices(&[[0, 0, 0], [16, 0, 0]])
        .normals(2)
        .records(2, None, None)
        .mscal()
        .uvs(&[[0, 0], [16, 0]]);
    let data = vif_file(&[&stream]);

    let model = decode_vif(&ByteRegion::whole(&data), UvScale::TEXELS).unwrap();
    let mesh = model.meshes()[0].mesh.as_ref().unwrap();
    assert_eq!(mesh.triangle_count(), 0);
    assert_eq!(mesh.vertex_count(), 2);
}

#[test]
fn test_second_uv_duplicates_vertex_and_weight() {
    let mut stream = Stream::default();
    stream
        .strip_tag(4, 4)
        .vertices(&[[0, 0, 0], [16, 0, 0], [0, 16, 0]])
        .normals(3)
        .records(3, None, Some((0, 3)))
        .weights(&[[4, 0xFF, 0xFF, 3]])
        .mscal()
        .uvs(&[[0, 0], [16, 0], [0, 16], [16, 16]]);
    let data = vif_file(&[&stream]);

    let model = decode_vif(&ByteRegion::whole(&data), UvScale::from_texture_size(1, 1)).unwrap();
    let mesh = model.meshes()[0].mesh.as_ref().unwrap();

    assert_eq!(mesh.triangles, [[0, 1, 2], [1, 2, 3]]);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.positions[3], mesh.positions[0]);
    assert_eq!(mesh.uvs[0], Some(Vec2::new(0.0, 0.0)));
    assert_eq!(mesh.uvs[3], Some(Vec2::new(1.0, 1.0)));

    let weight = mesh.weight_for(3).unwrap();
    assert_eq!((weight.start, weight.end), (3, 4));
    assert_eq!(weight.influences, [BoneInfluence { bone: 1, weight: 0xFF }]);
    assert_eq!(mesh.weight_for(1).map(|w| (w.start, w.end)), Some((0, 3)));
}

#[test]
fn test_non_strip_mesh_fails_alone() {
    let mut lines = Stream::default();
    five_slot_chunk(&mut lines, 3);
    let mut strip = Stream::default();
    five_slot_chunk(&mut strip, 4);
    let data = vif_file(&[&lines, &strip]);

    let model = decode_vif(&ByteRegion::whole(&data), UvScale::TEXELS).unwrap();
    assert_eq!(model.meshes().len(), 2);
    assert_eq!(
        model.meshes()[0].mesh,
        Err(Error::NotTriangleStrip { prim: 3 })
    );
    assert_eq!(model.meshes()[1].mesh.as_ref().map(|m| m.triangle_count()), Ok(2));
    assert_eq!(model.valid_meshes().count(), 1);
}

#[test]
fn test_unknown_command_keeps_earlier_chunks() {
    let mut stream = Stream::default();
    five_slot_chunk(&mut stream, 4);
    stream.code(0x13, 0, 0);
    stream.vertices(&[[1, 2, 3]]).mscal();
    let data = vif_file(&[&stream]);

    let model = decode_vif(&ByteRegion::whole(&data), UvScale::TEXELS).unwrap();
    let decoded = &model.meshes()[0];
    assert!(matches!(decoded.stop, StreamStop::Unsupported { .. }));
    assert_eq!(decoded.chunk_count, 1);
    assert_eq!(decoded.mesh.as_ref().map(|m| m.triangle_count()), Ok(2));
}

#[test]
fn test_missing_uvs() {
    let mut stream = Stream::default();
    stream
        .strip_tag(3, 4)
        .vertices(&[[0, 0, 0], [16, 0, 0], [0, 16, 0]])
        .normals(3)
        .records(3, None, None)
        .mscal();
    let data = vif_file(&[&stream]);

    let model = decode_vif(&ByteRegion::whole(&data), UvScale::TEXELS).unwrap();
    assert_eq!(model.meshes()[0].mesh, Err(Error::MissingUv { slot: 0 }));
}

#[test]
fn test_mesh_table_past_end() {
    let mut data = vec![0u8; 0x40];
    data[0x12] = 1;
    data[0x28..0x2C].copy_from_slice(&0x30u32.to_le_bytes());
    data[0x2C..0x30].copy_from_slice(&0x100u32.to_le_bytes());

    assert!(matches!(
        decode_vif(&ByteRegion::whole(&data), UvScale::TEXELS),
        Err(Error::MalformedHeader(_))
    ));
}
