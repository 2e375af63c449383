//! Construction of plugin child processes.
//!
//! An [`Invocation`] is a fully specified launch of one plugin: executable,
//! verbatim argument list, the plugin interface environment, a null stdin,
//! piped stdout and stderr, and optionally the message channel on file
//! descriptor 3. It is consumed by [`Invocation::spawn`]; nothing is shared
//! between two invocations of the same plugin.

use std::ffi::{OsStr, OsString};
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, RawFd};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};

use crate::descriptor::PluginDescriptor;
use crate::environment::plugin_environment;

/// File descriptor number of the message channel inside the plugin.
pub const MESSAGE_CHANNEL_FD: RawFd = 3;

/// A ready-to-launch plugin process.
///
/// The lifetime ties the invocation to the write end of the message channel,
/// which must stay open until the child has been spawned.
#[derive(Debug)]
pub struct Invocation<'fd> {
    command: Command,
    message_channel: Option<BorrowedFd<'fd>>,
}

impl<'fd> Invocation<'fd> {
    /// Prepares `plugin` to run with `args`, inheriting this process's
    /// environment.
    ///
    /// # Example
    ///
    /// ```
    /// use holo_config::Config;
    /// use holo_plugins::{Invocation, PluginDescriptor};
    ///
    /// let plugin = PluginDescriptor::new("files", &Config::default());
    /// let invocation = Invocation::new(&plugin, ["scan"], None);
    /// let args: Vec<_> = invocation.command().get_args().collect();
    /// assert_eq!(args, ["scan"]);
    /// ```
    #[must_use]
    pub fn new<I, S>(
        plugin: &PluginDescriptor,
        args: I,
        message_channel: Option<BorrowedFd<'fd>>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::with_parent_env(plugin, args, message_channel, |key| {
            std::env::var_os(key)
        })
    }

    /// Like [`Invocation::new`], but consults `parent` instead of the process
    /// environment when deciding whether `HOLO_ROOT_DIR` is already pinned.
    #[must_use]
    pub fn with_parent_env<I, S, F>(
        plugin: &PluginDescriptor,
        args: I,
        message_channel: Option<BorrowedFd<'fd>>,
        parent: F,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        F: Fn(&str) -> Option<OsString>,
    {
        let mut command = Command::new(plugin.executable().as_std_path());
        command
            .args(args)
            .envs(plugin_environment(plugin, parent))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        Self {
            command,
            message_channel,
        }
    }

    /// The underlying command, for inspection.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Whether the child will receive a message channel on descriptor 3.
    #[must_use]
    pub const fn has_message_channel(&self) -> bool {
        self.message_channel.is_some()
    }

    /// Starts the plugin process without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns the operating system error when the process cannot be
    /// started, for example because the executable does not exist.
    pub fn spawn(self) -> io::Result<Child> {
        let Self {
            mut command,
            message_channel,
        } = self;
        match message_channel {
            Some(channel) => attach_message_channel(&mut command, channel.as_raw_fd()),
            None => detach_message_channel(&mut command),
        }
        command.spawn()
    }
}

/// Makes `fd` appear as [`MESSAGE_CHANNEL_FD`] in the child.
///
/// The parent's pipe ends are close-on-exec, so only the duplicate on
/// descriptor 3 survives into the plugin.
fn attach_message_channel(command: &mut Command, fd: RawFd) {
    let hook = move || -> io::Result<()> {
        let status = if fd == MESSAGE_CHANNEL_FD {
            // dup2 onto itself would leave FD_CLOEXEC set.
            // SAFETY: fcntl is async-signal-safe and `fd` is open in the child.
            unsafe {
                let flags = libc::fcntl(fd, libc::F_GETFD);
                if flags == -1 {
                    flags
                } else {
                    libc::fcntl(fd, libc::F_SETFD, flags & !libc::FD_CLOEXEC)
                }
            }
        } else {
            // SAFETY: dup2 is async-signal-safe and both descriptors are valid.
            unsafe { libc::dup2(fd, MESSAGE_CHANNEL_FD) }
        };
        if status == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    };
    // SAFETY: the hook runs between fork and exec and only calls
    // async-signal-safe functions without allocating.
    unsafe {
        command.pre_exec(hook);
    }
}

/// Keeps a descriptor 3 inherited by this process out of the child.
///
/// A nested run would otherwise let the plugin write into the outer
/// caller's message channel. Close-on-exec descriptors are left alone: exec
/// closes them anyway, and one of them may be the pipe `spawn` uses to
/// report exec failures.
fn detach_message_channel(command: &mut Command) {
    let hook = || -> io::Result<()> {
        // SAFETY: fcntl and close are async-signal-safe; an fd 3 that is not
        // open yields EBADF, which is treated as already detached.
        let status = unsafe {
            let flags = libc::fcntl(MESSAGE_CHANNEL_FD, libc::F_GETFD);
            if flags == -1 || flags & libc::FD_CLOEXEC != 0 {
                0
            } else {
                libc::close(MESSAGE_CHANNEL_FD)
            }
        };
        if status == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    };
    // SAFETY: the hook runs between fork and exec and only calls
    // async-signal-safe functions without allocating.
    unsafe {
        command.pre_exec(hook);
    }
}
