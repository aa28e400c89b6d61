//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] that provides additional methods
//! for working with byte data.
//!
//! # Overview
//!
//! The [`Blob`] struct is a simple wrapper around a `Vec<u8>` that provides methods for creating, accessing,
//! and manipulating byte data. It includes various utility methods for common operations on byte slices,
//! such as creating slices, reading ranges, and converting to and from different types.
//!
//! # Examples
//!
//! ```rust
//! use vectile_core::Blob;
//!
//! // Creating a new Blob from a vector of bytes
//! let vec = vec![0, 1, 2, 3, 4, 5, 6, 7];
//! let blob = Blob::from(&vec);
//! assert_eq!(blob.len(), 8);
//! assert_eq!(blob.range(2..5), &vec![2, 3, 4]);
//! assert_eq!(blob.clone().into_vec(), vec);
//!
//! // Creating a new Blob from a string
//! let text = String::from("Xylofön");
//! let blob = Blob::from(&text);
//! assert_eq!(blob.as_str(), "Xylofön");
//! ```

use anyhow::Result;
use std::fmt::Debug;
use std::ops::Range;
use std::path::Path;

/// A simple wrapper around [`Vec<u8>`] that provides additional methods for working with byte data.
///
/// # Examples
///
/// ```rust
/// use vectile_core::Blob;
///
/// // Create a Blob from a string
/// let blob = Blob::from("Hello, world!");
/// assert_eq!(blob.len(), 13);
/// assert_eq!(blob.as_str(), "Hello, world!");
///
/// // Create a Blob from a byte slice
/// let bytes = &[0x41, 0x42, 0x43];
/// let blob2 = Blob::from(bytes);
/// assert_eq!(blob2.as_str(), "ABC");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

#[allow(dead_code)]
impl Blob {
	/// Creates an empty `Blob`.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let empty_blob = Blob::new_empty();
	/// assert_eq!(empty_blob.len(), 0);
	/// assert!(empty_blob.is_empty());
	/// ```
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Creates a `Blob` with the specified size, filled with zeros.
	///
	/// # Arguments
	///
	/// * `length` - The size of the `Blob`.
	///
	/// # Returns
	///
	/// A `Blob` filled with zeros of the specified size.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::new_sized(5);
	/// assert_eq!(blob.len(), 5);
	/// assert_eq!(blob.as_slice(), &[0, 0, 0, 0, 0]);
	/// ```
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	/// Returns a byte slice from the specified `range`.
	///
	/// # Arguments
	///
	/// * `range` - The range of bytes to extract.
	///
	/// # Returns
	///
	/// A reference to the slice of bytes in the specified range.
	///
	/// # Panics
	///
	/// Panics if the specified range is out of bounds.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from(&[10, 20, 30, 40, 50]);
	/// let slice = blob.range(1..4);
	/// assert_eq!(slice, &[20, 30, 40]);
	/// ```
	#[must_use]
	pub fn range(&self, range: Range<usize>) -> &[u8] {
		&self.0[range]
	}

	/// Returns a reference to the underlying byte slice.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from("hello");
	/// assert_eq!(blob.as_slice(), b"hello");
	/// ```
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	/// Returns a mutable reference to the underlying byte slice.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let mut blob = Blob::from("abc");
	/// let slice = blob.as_mut_slice();
	/// slice[0] = b'z';
	/// assert_eq!(blob.as_str(), "zbc");
	/// ```
	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		self.0.as_mut()
	}

	/// Consumes this [`Blob`] and returns the underlying `Vec<u8>`.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from(&[1, 2, 3]);
	/// let vec = blob.into_vec();
	/// assert_eq!(vec, vec![1, 2, 3]);
	/// ```
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the underlying bytes as a string slice (`&str`), assuming they represent valid UTF-8 encoded text.
	///
	/// # Panics
	///
	/// Panics if the bytes are not valid UTF-8.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from("Xylofön");
	/// assert_eq!(blob.as_str(), "Xylofön");
	/// ```
	#[must_use]
	pub fn as_str(&self) -> &str {
		std::str::from_utf8(&self.0).expect("Blob content was not valid UTF-8")
	}

	/// Converts the [`Blob`] into a `String`, assuming it contains valid UTF-8 encoded text.
	///
	/// # Panics
	///
	/// Panics if the bytes are not valid UTF-8.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from("Hello");
	/// let s = blob.into_string();
	/// assert_eq!(s, "Hello");
	/// ```
	#[must_use]
	pub fn into_string(self) -> String {
		String::from_utf8(self.0).expect("Blob content was not valid UTF-8")
	}

	/// Returns a hexadecimal string representation of the underlying bytes, with each byte separated by a space.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from(&[0xDE, 0xAD, 0xBE, 0xEF]);
	/// assert_eq!(blob.as_hex(), "de ad be ef");
	/// ```
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Returns the length of the underlying byte slice.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from("Hello");
	/// assert_eq!(blob.len(), 5);
	/// ```
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	/// Returns `true` if the underlying byte slice is empty, `false` otherwise.
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::new_empty();
	/// assert!(blob.is_empty());
	/// ```
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Saves the contents of this [`Blob`] to the given filesystem path.
	///
	/// # Arguments
	///
	/// * `path` - Destination path where the bytes will be written.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be created or written (for example due to
	/// insufficient permissions, a non‑existent parent directory, or running out of disk space).
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	/// use std::path::PathBuf;
	/// # use anyhow::Result;
	/// # fn main() -> Result<()> {
	/// let data = Blob::from(&[1u8, 2, 3, 4]);
	/// let path = PathBuf::from("tmp_blob_save.bin");
	/// data.save_to_file(&path)?;
	/// assert!(path.exists());
	/// std::fs::remove_file(&path)?;
	/// # Ok(())
	/// # }
	/// ```
	pub fn save_to_file(&self, path: &Path) -> Result<()> {
		std::fs::write(path, &self.0)?;
		Ok(())
	}

	/// Loads a [`Blob`] from the given filesystem path by reading all bytes from the file.
	///
	/// # Arguments
	///
	/// * `path` - Path to the file to read.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be opened or read (for example if the file does not
	/// exist or the process lacks permissions).
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	/// use std::path::PathBuf;
	/// # use anyhow::Result;
	/// # fn main() -> Result<()> {
	/// let original = Blob::from("Hello, files!");
	/// let path = PathBuf::from("tmp_blob_load.bin");
	/// original.save_to_file(&path)?;
	///
	/// let loaded = Blob::load_from_file(&path)?;
	/// assert_eq!(loaded.as_str(), "Hello, files!");
	///
	/// std::fs::remove_file(&path)?;
	/// # Ok(())
	/// # }
	/// ```
	pub fn load_from_file(path: &Path) -> Result<Self> {
		Ok(Blob::from(std::fs::read(path)?))
	}
}

// Conversion implementations
impl From<Vec<u8>> for Blob {
	/// Converts a `Vec<u8>` into a [`Blob`].
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from(vec![1, 2, 3]);
	/// assert_eq!(blob.len(), 3);
	/// ```
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&Vec<u8>> for Blob {
	/// Converts a reference to a `Vec<u8>` into a [`Blob`].
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let vec = vec![4, 5, 6];
	/// let blob = Blob::from(&vec);
	/// assert_eq!(blob.len(), 3);
	/// ```
	fn from(item: &Vec<u8>) -> Self {
		Blob(item.clone())
	}
}

impl From<&[u8]> for Blob {
	/// Converts a byte slice (`&[u8]`) into a [`Blob`].
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let vec = vec![0, 1, 2];
	/// let blob = Blob::from(vec.as_slice());
	/// assert_eq!(blob.len(), 3);
	/// ```
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	/// Converts a byte array (`&[u8; N]`) into a [`Blob`].
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from(&[0, 1, 2]);
	/// assert_eq!(blob.len(), 3);
	/// ```
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	/// Converts a string slice (`&str`) into a [`Blob`].
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let blob = Blob::from("Hello, world!");
	/// assert_eq!(blob.len(), 13);
	/// ```
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<&String> for Blob {
	/// Converts a reference to a [`String`] into a [`Blob`].
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let s = String::from("Example");
	/// let blob = Blob::from(&s);
	/// assert_eq!(blob.as_str(), "Example");
	/// ```
	fn from(item: &String) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	/// Converts a [`String`] into a [`Blob`].
	///
	/// # Examples
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let s = String::from("Data");
	/// let blob = Blob::from(s);
	/// assert_eq!(blob.as_str(), "Data");
	/// ```
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

/// Implements [`Debug`] by printing the byte length and hexadecimal representation of the bytes.
impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
	}
}

/// Implements [`std::fmt::Display`] by printing the (lossy) UTF-8 interpretation of the bytes.
impl std::fmt::Display for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		// Use `String::from_utf8_lossy` to avoid panicking on invalid UTF-8.
		write!(f, "{}", String::from_utf8_lossy(&self.0))
	}
}

impl Default for Blob {
	/// Returns an empty [`Blob`] by default.
	fn default() -> Self {
		Self::new_empty()
	}
}

// Allow `Blob` to be used in multithreaded scenarios
unsafe impl Send for Blob {}
unsafe impl Sync for Blob {}
