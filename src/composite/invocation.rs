use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Tile layout as `columns x rows`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub columns: u32,
    pub rows: u32,
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Size and offset of each cell as `WxH+X+Y`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub width: u32,
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl CellGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl fmt::Display for CellGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.offset_x, self.offset_y
        )
    }
}

/// One call of the external tiling tool.
///
/// Inputs are an explicit ordered list; nothing is ever expanded from a
/// wildcard, so the tile order is exactly the order of `inputs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInvocation {
    pub inputs: Vec<PathBuf>,
    pub grid: TileGrid,
    pub geometry: CellGeometry,
    pub transparent: bool,
    pub output: PathBuf,
}

impl TileInvocation {
    /// Argument list in `montage` order: background, tile, geometry, inputs, output.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(self.inputs.len() + 7);

        if self.transparent {
            args.push("-background".into());
            args.push("none".into());
        }
        args.push("-tile".into());
        args.push(self.grid.to_string().into());
        args.push("-geometry".into());
        args.push(self.geometry.to_string().into());
        args.extend(self.inputs.iter().map(|p| p.as_os_str().to_os_string()));
        args.push(self.output.as_os_str().to_os_string());

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_order() {
        let invocation = TileInvocation {
            inputs: vec![PathBuf::from("a b/0001.png"), PathBuf::from("a b/0002.png")],
            grid: TileGrid {
                columns: 2,
                rows: 1,
            },
            geometry: CellGeometry::new(64, 32),
            transparent: true,
            output: PathBuf::from("out/Walk_N.png"),
        };

        let args: Vec<_> = invocation
            .to_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "-background",
                "none",
                "-tile",
                "2x1",
                "-geometry",
                "64x32+0+0",
                "a b/0001.png",
                "a b/0002.png",
                "out/Walk_N.png",
            ]
        );
    }

    #[test]
    fn test_opaque_omits_background() {
        let invocation = TileInvocation {
            inputs: vec![PathBuf::from("x.png")],
            grid: TileGrid {
                columns: 1,
                rows: 1,
            },
            geometry: CellGeometry::new(8, 8),
            transparent: false,
            output: PathBuf::from("y.png"),
        };
        assert_eq!(invocation.to_args()[0], OsString::from("-tile"));
    }
}
