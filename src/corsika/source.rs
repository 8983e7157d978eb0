//! Byte sources a raw stream can read from.
//!
//! A [`ByteSource`] is a [`Read`] that also states whether it supports random
//! access and how it can be rewound to its start. Three sources are provided:
//!
//! - [`Seekable`]: any `Read + Seek`, such as a [`File`] or an in-memory cursor
//! - [`Sequential`]: a forward-only reader, such as a pipe or stdin, optionally
//!   paired with an opener that produces a fresh reader from the start
//! - [`SharedSource`]: a lock-protected handle shared with another component

use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use super::types::error::{CorsikaError, Result};

/// A readable byte source with declared seeking capability.
pub trait ByteSource: Read {
    /// Whether [`seek_to`](ByteSource::seek_to) can be used.
    fn is_seekable(&self) -> bool;

    /// Moves the read position to an absolute byte offset.
    ///
    /// Only called on sources that report [`is_seekable`](ByteSource::is_seekable).
    fn seek_to(&mut self, offset: u64) -> io::Result<()>;

    /// Whether [`reopen`](ByteSource::reopen) can restart the source.
    fn can_reopen(&self) -> bool {
        self.is_seekable()
    }

    /// Restarts the source at byte 0.
    ///
    /// Sources that can do neither seeking nor reopening return an error of
    /// kind [`ErrorKind::Unsupported`].
    fn reopen(&mut self) -> io::Result<()>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        (**self).seek_to(offset)
    }

    fn can_reopen(&self) -> bool {
        (**self).can_reopen()
    }

    fn reopen(&mut self) -> io::Result<()> {
        (**self).reopen()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        (**self).seek_to(offset)
    }

    fn can_reopen(&self) -> bool {
        (**self).can_reopen()
    }

    fn reopen(&mut self) -> io::Result<()> {
        (**self).reopen()
    }
}

/// A random-access source backed by any `Read + Seek`.
#[derive(Debug)]
pub struct Seekable<R> {
    inner: R,
}

impl<R: Read + Seek> Seekable<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Direct access to the inner reader. Moving its position desynchronises
    /// any stream built on this source until that stream seeks again.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl Seekable<File> {
    /// Opens a file on disk as a seekable source.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> Read for Seekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Seek> ByteSource for Seekable<R> {
    fn is_seekable(&self) -> bool {
        true
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn reopen(&mut self) -> io::Result<()> {
        self.seek_to(0)
    }
}

type Opener<R> = Box<dyn FnMut() -> io::Result<R> + Send>;

/// A forward-only source.
///
/// Seeking is emulated by the stream by reading forward. Seeking backward
/// requires an opener that yields a fresh reader positioned at byte 0.
pub struct Sequential<R> {
    inner: R,
    opener: Option<Opener<R>>,
}

impl<R: Read> Sequential<R> {
    /// Wraps a reader that can only be consumed once.
    pub fn new(inner: R) -> Self {
        Self { inner, opener: None }
    }

    /// Builds a source from an opener, which is called now and again on every reopen.
    pub fn reopenable<F>(mut opener: F) -> io::Result<Self>
    where
        F: FnMut() -> io::Result<R> + Send + 'static,
    {
        let inner = opener()?;
        Ok(Self {
            inner,
            opener: Some(Box::new(opener)),
        })
    }
}

impl<R> std::fmt::Debug for Sequential<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequential")
            .field("reopenable", &self.opener.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Read> Read for Sequential<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> ByteSource for Sequential<R> {
    fn is_seekable(&self) -> bool {
        false
    }

    fn seek_to(&mut self, _offset: u64) -> io::Result<()> {
        Err(io::Error::new(ErrorKind::Unsupported, "source is not seekable"))
    }

    fn can_reopen(&self) -> bool {
        self.opener.is_some()
    }

    fn reopen(&mut self) -> io::Result<()> {
        match self.opener.as_mut() {
            Some(opener) => {
                self.inner = opener()?;
                Ok(())
            }
            None => Err(io::Error::new(ErrorKind::Unsupported, "source cannot be reopened")),
        }
    }
}

/// A byte source shared between a stream and another component.
///
/// Every read or seek takes the lock for the duration of the call, so only one
/// holder touches the source position at a time. Holders are expected to take
/// turns: a stream assumes nobody moved the position between its own calls.
#[derive(Debug)]
pub struct SharedSource<S> {
    inner: Arc<Mutex<S>>,
    seekable: bool,
    reopenable: bool,
}

impl<S: ByteSource> SharedSource<S> {
    pub fn new(source: S) -> Self {
        let seekable = source.is_seekable();
        let reopenable = source.can_reopen();
        Self {
            inner: Arc::new(Mutex::new(source)),
            seekable,
            reopenable,
        }
    }

    /// Takes exclusive access to the underlying source.
    pub fn lock(&self) -> Result<MutexGuard<'_, S>> {
        self.inner.lock().map_err(|_| CorsikaError::LockPoisoned)
    }

    fn guard(&self) -> io::Result<MutexGuard<'_, S>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other(CorsikaError::LockPoisoned))
    }
}

impl<S> Clone for SharedSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            seekable: self.seekable,
            reopenable: self.reopenable,
        }
    }
}

impl<S: ByteSource> Read for SharedSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.guard()?.read(buf)
    }
}

impl<S: ByteSource> ByteSource for SharedSource<S> {
    fn is_seekable(&self) -> bool {
        self.seekable
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.guard()?.seek_to(offset)
    }

    fn can_reopen(&self) -> bool {
        self.reopenable
    }

    fn reopen(&mut self) -> io::Result<()> {
        self.guard()?.reopen()
    }
}
