use std::mem::size_of;

/// Byte offset of a record inside an arena slice.
pub type DataIndex = u32;

/// Null handle for arena-addressed nodes.
pub const NIL: DataIndex = DataIndex::MAX;

/// Marker trait for records that may be read out of an arena with
/// [`get_helper`]. Keeps callers from casting a bare payload where a whole
/// node was meant.
pub trait Get: bytemuck::Pod {}

/// Read a struct of type T in an array of data at a given index.
pub fn get_helper<T: Get>(data: &[u8], index: DataIndex) -> &T {
    let index_usize: usize = index as usize;
    bytemuck::from_bytes(&data[index_usize..index_usize + size_of::<T>()])
}

/// Read a struct of type T in an array of data at a given index.
pub fn get_mut_helper<T: Get>(data: &mut [u8], index: DataIndex) -> &mut T {
    let index_usize: usize = index as usize;
    bytemuck::from_bytes_mut(&mut data[index_usize..index_usize + size_of::<T>()])
}

/// Whether a record of type T starting at index fits inside data.
pub fn fits<T: Get>(data: &[u8], index: DataIndex) -> bool {
    index != NIL
        && (index as usize)
            .checked_add(size_of::<T>())
            .is_some_and(|end| end <= data.len())
}

/// The standard `bool` is not a `Pod`, define a replacement that is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(transparent)]
pub struct PodBool(pub u8);
impl PodBool {
    pub const fn from_bool(b: bool) -> Self {
        Self(if b { 1 } else { 0 })
    }

    pub const fn get(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for PodBool {
    fn from(b: bool) -> Self {
        Self::from_bool(b)
    }
}

#[test]
fn test_pod_bool() {
    assert!(!PodBool::from_bool(false).get());
    assert!(PodBool::from(true).get());
    assert_eq!(PodBool::default(), PodBool::from(false));
}

#[test]
fn test_fits() {
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Record {
        left: DataIndex,
        right: DataIndex,
    }
    impl Get for Record {}

    let data: [u8; 32] = [0; 32];
    assert!(fits::<Record>(&data, 0));
    assert!(fits::<Record>(&data, 24));
    assert!(!fits::<Record>(&data, 25));
    assert!(!fits::<Record>(&data, 32));
    assert!(!fits::<Record>(&data, NIL));
    assert!(!fits::<Record>(&data, NIL - 4));
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "trace")]
        {
            ::log::trace!("[{}:{}] {}", ::std::file!(), ::std::line!(), ::std::format_args!($($arg)*));
        }
        #[cfg(not(feature = "trace"))]
        {
            if false {
                let _ = ::std::format_args!($($arg)*);
            }
        }
    };
}
