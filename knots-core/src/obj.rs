/// Wavefront OBJ geometry parser
use nalgebra::{Point3, Vector3};
use nom::{
    branch::alt,
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, map, opt},
    multi::{many0, separated_list1},
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{LoadError, LoadResult};
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::mtl::{keyword, name, strip_comment, Material, MaterialLibrary};
use crate::scene::Shape;

/// One corner of a face. Indices are as written: 1-based, or negative for
/// "relative to the end of the list so far".
#[derive(Debug, Clone, Copy, PartialEq)]
struct VertexRef {
    position: i64,
    normal: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Statement<'a> {
    Position(Point3<f32>),
    Normal(Vector3<f32>),
    Face(Vec<VertexRef>),
    UseMaterial(&'a str),
}

const KEYWORDS: &[&str] = &["v", "vn", "f", "usemtl"];

/// Parse an OBJ document into one shape per `usemtl` run.
///
/// Materials are looked up in `materials`; an unknown name keeps its name but
/// falls back to default surface values. Polygons are fan-triangulated and
/// faces without normals are flat shaded.
pub fn parse_obj(file: &str, input: &str, materials: &MaterialLibrary) -> LoadResult<Vec<Shape>> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut shapes: Vec<Shape> = Vec::new();
    let mut current = Shape::new(Material::default());

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();
        let Some(word) = line.split_whitespace().next() else {
            continue;
        };
        if !KEYWORDS.contains(&word) {
            continue;
        }

        let statement = match all_consuming(statement)(line) {
            Ok((_, statement)) => statement,
            Err(_) => {
                return Err(LoadError::parse(
                    file,
                    line_no,
                    format!("malformed `{word}` statement"),
                ))
            }
        };

        match statement {
            Statement::Position(p) => positions.push(p),
            Statement::Normal(n) => normals.push(n),
            Statement::UseMaterial(material_name) => {
                let material = match materials.get(material_name) {
                    Some(material) => material.clone(),
                    None => {
                        log::warn!("{file}:{line_no}: unknown material `{material_name}`, using defaults");
                        Material::named(material_name)
                    }
                };
                let finished = std::mem::replace(&mut current, Shape::new(material));
                if !finished.mesh.is_empty() {
                    shapes.push(finished);
                }
            }
            Statement::Face(refs) => {
                if refs.len() < 3 {
                    return Err(LoadError::parse(file, line_no, "face needs at least three vertices"));
                }
                let corners = refs
                    .iter()
                    .map(|r| resolve_corner(r, &positions, &normals))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| LoadError::parse(file, line_no, "face index out of range"))?;

                for k in 1..corners.len() - 1 {
                    current
                        .mesh
                        .add_triangle(triangle(corners[0], corners[k], corners[k + 1]));
                }
            }
        }
    }

    if !current.mesh.is_empty() {
        shapes.push(current);
    }
    Ok(shapes)
}

type Corner = (Point3<f32>, Option<Vector3<f32>>);

fn resolve_corner(r: &VertexRef, positions: &[Point3<f32>], normals: &[Vector3<f32>]) -> Option<Corner> {
    let position = positions[resolve_index(r.position, positions.len())?];
    let normal = match r.normal {
        Some(n) => Some(normals[resolve_index(n, normals.len())?]),
        None => None,
    };
    Some((position, normal))
}

/// Map a written OBJ index to a 0-based slot given `count` elements so far.
fn resolve_index(written: i64, count: usize) -> Option<usize> {
    let magnitude = usize::try_from(written.unsigned_abs()).ok()?;
    match written {
        0 => None,
        w if w > 0 && magnitude <= count => Some(magnitude - 1),
        w if w < 0 && magnitude <= count => Some(count - magnitude),
        _ => None,
    }
}

fn triangle(a: Corner, b: Corner, c: Corner) -> Triangle {
    match (a.1, b.1, c.1) {
        (Some(na), Some(nb), Some(nc)) => {
            Triangle::new(Vertex::new(a.0, na), Vertex::new(b.0, nb), Vertex::new(c.0, nc))
        }
        _ => Triangle::flat(a.0, b.0, c.0),
    }
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        map(preceded(keyword("v"), position), Statement::Position),
        map(preceded(keyword("vn"), terminated(vec3, space0)), |v| {
            Statement::Normal(Vector3::new(v.0, v.1, v.2))
        }),
        map(
            preceded(keyword("f"), terminated(separated_list1(space1, vertex_ref), space0)),
            Statement::Face,
        ),
        map(preceded(keyword("usemtl"), name), Statement::UseMaterial),
    ))(input)
}

/// `x y z`, optionally followed by `w` or a vertex colour, which are dropped
fn position(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, (x, y, z)) = vec3(input)?;
    let (input, _) = many0(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn vec3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    tuple((float, preceded(space1, float), preceded(space1, float)))(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn vertex_ref(input: &str) -> IResult<&str, VertexRef> {
    let (input, position) = index(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), opt(index)))),
    ))(input)?;
    let normal = rest.and_then(|(_texcoord, normal)| normal.flatten());
    Ok((input, VertexRef { position, normal }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mtl::parse_mtl;

    const SQUARE: &str = "\
# two materials, one quad each
mtllib square.mtl
o Square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
usemtl red
f 1//1 2//1 3//1 4//1
usemtl blue
s off
f -4 -3 -2
";

    fn library() -> MaterialLibrary {
        parse_mtl("square.mtl", "newmtl red\nKd 1 0 0\nnewmtl blue\nKd 0 0 1\n").unwrap()
    }

    #[test]
    fn test_shapes_split_on_usemtl() {
        let shapes = parse_obj("square.obj", SQUARE, &library()).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].material.name, "red");
        assert_eq!(shapes[0].mesh.len(), 2);
        assert_eq!(shapes[1].material.name, "blue");
        assert_eq!(shapes[1].mesh.len(), 1);
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let shapes = parse_obj("square.obj", SQUARE, &library()).unwrap();
        let quad = &shapes[0].mesh.triangles;
        assert_eq!(quad[0].vertices[0].position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(quad[0].vertices[2].position, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(quad[1].vertices[0].position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(quad[1].vertices[2].position, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_negative_indices_and_flat_normals() {
        let shapes = parse_obj("square.obj", SQUARE, &library()).unwrap();
        let tri = &shapes[1].mesh.triangles[0];
        assert_eq!(tri.vertices[0].position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(tri.vertices[1].position, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(tri.vertices[2].position, Point3::new(1.0, 1.0, 0.0));
        assert!((tri.vertices[0].normal - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_all_reference_forms() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1 2/1 3/1/1\nf 1//1 2 3\n";
        let shapes = parse_obj("forms.obj", obj, &MaterialLibrary::default()).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].mesh.len(), 2);
        assert_eq!(shapes[0].material, Material::default());
    }

    #[test]
    fn test_unknown_material_falls_back() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl missing\nf 1 2 3\n";
        let shapes = parse_obj("m.obj", obj, &MaterialLibrary::default()).unwrap();
        assert_eq!(shapes[0].material, Material::named("missing"));
    }

    #[test]
    fn test_vertex_colours_are_ignored() {
        let obj = "v 0 0 0 1 0 0\nv 1 0 0 1 0 0\nv 0 1 0 1 0 0\nf 1 2 3\n";
        let shapes = parse_obj("c.obj", obj, &MaterialLibrary::default()).unwrap();
        assert_eq!(shapes[0].mesh.triangles[0].vertices[1].position, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let obj = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let err = parse_obj("bad.obj", obj, &MaterialLibrary::default()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_degenerate_face_is_an_error() {
        let obj = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        let err = parse_obj("bad.obj", obj, &MaterialLibrary::default()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(1, 3), Some(0));
        assert_eq!(resolve_index(3, 3), Some(2));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(0, 3), None);
        assert_eq!(resolve_index(4, 3), None);
        assert_eq!(resolve_index(-4, 3), None);
    }
}
