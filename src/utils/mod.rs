//! Various unsorted geometrical and logical operators.

pub use self::ccw_face_normal::ccw_face_normal;
pub use self::center::center;
pub use self::cross_matrix::cross_matrix;
pub use self::inv::inv;
pub use self::sdp_matrix::SdpMatrix3;
pub use self::sorted_pair::SortedPair;

mod ccw_face_normal;
mod center;
mod cross_matrix;
mod inv;
mod sdp_matrix;
mod sorted_pair;
