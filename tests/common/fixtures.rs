//! Test fixtures - scripted external tools.
//!
//! `FAKE_COLMAP` fabricates the artifacts each reconstruction stage would
//! leave behind. Behaviour switches:
//! - `FAKE_COLMAP_FAIL=<tool>` makes that tool print a diagnostic and exit 3
//! - `FAKE_COLMAP_EMPTY_SPARSE=1` makes the mapper leave `sparse/` empty
//! - `FAKE_COLMAP_LOG=<file>` appends every invoked tool name to a file

/// Stand-in for the colmap executable
pub const FAKE_COLMAP: &str = r#"#!/bin/sh
tool="$1"
shift
while [ $# -gt 0 ]; do
  case "$1" in
    --database_path) db="$2"; shift 2 ;;
    --output_path) out="$2"; shift 2 ;;
    --workspace_path) ws="$2"; shift 2 ;;
    *) shift ;;
  esac
done

[ -n "$FAKE_COLMAP_LOG" ] && echo "$tool" >> "$FAKE_COLMAP_LOG"
echo "fake colmap: $tool"

if [ "$tool" = "$FAKE_COLMAP_FAIL" ]; then
  echo "E1019 $tool: CUDA driver version is insufficient" >&2
  exit 3
fi

case "$tool" in
  feature_extractor|exhaustive_matcher)
    echo "$tool" >> "$db"
    ;;
  mapper)
    if [ -z "$FAKE_COLMAP_EMPTY_SPARSE" ]; then
      mkdir -p "$out/0"
      printf '\001\000\000\000\000\000\000\000' > "$out/0/cameras.bin"
      printf '\003\000\000\000\000\000\000\000' > "$out/0/images.bin"
      printf '\003\000\000\000\000\000\000\000' > "$out/0/points3D.bin"
    fi
    ;;
  image_undistorter)
    mkdir -p "$out/images" "$out/sparse"
    echo img > "$out/images/frame_000001.jpg"
    echo cam > "$out/sparse/cameras.bin"
    ;;
  patch_match_stereo)
    mkdir -p "$ws/stereo/depth_maps"
    echo depth > "$ws/stereo/depth_maps/frame_000001.jpg.geometric.bin"
    ;;
  stereo_fusion)
    cat > "$out" <<'PLY'
ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property float nx
property float ny
property float nz
property uchar red
property uchar green
property uchar blue
end_header
0 0 0 0 0 1 200 10 10
1 0 0 0 0 1 10 200 10
0 1 0 0 0 1 10 10 200
PLY
    ;;
  poisson_mesher)
    cat > "$out" <<'PLY'
ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 2
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
3 0 1 2
3 0 2 3
PLY
    ;;
  *)
    echo "unknown tool $tool" >&2
    exit 1
    ;;
esac
"#;

/// Stand-in for ffprobe: one 4x2 stream at 10 fps
pub const FAKE_FFPROBE: &str = r#"#!/bin/sh
echo '{"streams":[{"width":4,"height":2,"avg_frame_rate":"10/1","r_frame_rate":"10/1"}]}'
"#;

/// Stand-in for ffmpeg: ten black 4x2 RGB24 frames on stdout
pub const FAKE_FFMPEG: &str = r#"#!/bin/sh
head -c 240 /dev/zero
"#;
