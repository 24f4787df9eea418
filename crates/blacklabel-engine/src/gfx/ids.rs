use std::fmt;

/// Geometry buffer handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct GeometryId(pub(crate) u64);

/// Material handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MaterialId(pub(crate) u64);

/// Rendering surface handle. Also what a host container holds as a child.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RendererId(pub(crate) u64);

/// Any disposable engine resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Resource {
    Geometry(GeometryId),
    Material(MaterialId),
    Renderer(RendererId),
}

impl From<GeometryId> for Resource {
    fn from(id: GeometryId) -> Self {
        Resource::Geometry(id)
    }
}

impl From<MaterialId> for Resource {
    fn from(id: MaterialId) -> Self {
        Resource::Material(id)
    }
}

impl From<RendererId> for Resource {
    fn from(id: RendererId) -> Self {
        Resource::Renderer(id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Geometry(id) => write!(f, "geometry #{}", id.0),
            Resource::Material(id) => write!(f, "material #{}", id.0),
            Resource::Renderer(id) => write!(f, "renderer #{}", id.0),
        }
    }
}
