// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Numeric layout of the terminal control block
//!
//! Linux and the BSD family (including Darwin) agree on the names of the
//! termios fields but not on their values. Everything that touches individual
//! bits or control characters goes through a [`Layout`], so the rest of the
//! crate never spells out a platform-specific number.

/// Control character indices and flag bits used by the raw-mode controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Human readable name of the layout
    pub name: &'static str,
    /// Index of the erase character in the control character array
    pub verase: usize,
    /// Index of the minimum byte count for non-canonical reads
    pub vmin: usize,
    /// Index of the inter-byte timeout for non-canonical reads
    pub vtime: usize,
    /// Input flag: XON/XOFF flow control on output
    pub ixon: u64,
    /// Input flag: XON/XOFF flow control on input
    pub ixoff: u64,
    /// Local flag: generate signals for INTR, QUIT and SUSP
    pub isig: u64,
    /// Local flag: canonical (line buffered) input
    pub icanon: u64,
    /// Local flag: echo input characters
    pub echo: u64,
    /// Local flag: implementation-defined input processing
    pub iexten: u64,
    /// Ctrl+Y is the delayed suspend character
    pub delayed_suspend: bool,
}

/// glibc, musl and bionic on architectures with the generic termios numbering
pub const LINUX: Layout = Layout {
    name: "linux",
    verase: 2,
    vmin: 6,
    vtime: 5,
    ixon: 0x0400,
    ixoff: 0x1000,
    isig: 0x0001,
    icanon: 0x0002,
    echo: 0x0008,
    iexten: 0x8000,
    delayed_suspend: false,
};

/// macOS, iOS and the BSDs
pub const BSD: Layout = Layout {
    name: "bsd",
    verase: 3,
    vmin: 16,
    vtime: 17,
    ixon: 0x0200,
    ixoff: 0x0400,
    isig: 0x0080,
    icanon: 0x0100,
    echo: 0x0008,
    iexten: 0x0400,
    delayed_suspend: true,
};

/// Layout of the platform the crate was compiled for
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "arm",
        target_arch = "aarch64",
        target_arch = "riscv32",
        target_arch = "riscv64",
        target_arch = "loongarch64",
        target_arch = "s390x"
    )
))]
pub const NATIVE: &Layout = &LINUX;

/// Layout of the platform the crate was compiled for
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
pub const NATIVE: &Layout = &BSD;

// Linux on powerpc, mips and sparc numbers its flags and control characters
// differently from both tables
#[cfg(not(any(
    all(
        any(target_os = "linux", target_os = "android"),
        any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "arm",
            target_arch = "aarch64",
            target_arch = "riscv32",
            target_arch = "riscv64",
            target_arch = "loongarch64",
            target_arch = "s390x"
        )
    ),
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
)))]
compile_error!("no termios layout is known for this target");
