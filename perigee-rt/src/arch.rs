//! # Architecture-specific continuation switching
//!
//! Each task owns a private stack and a [`SavedContext`]: the stack pointer it
//! had when it last suspended, with the callee-saved register set spilled just
//! below it. [`switch`] spills the calling task's registers, publishes its
//! stack pointer, adopts the target's stack pointer, and reloads the target's
//! registers — returning as if the target's own `switch` call had just come
//! back.
//!
//! ## Background: Why Fabricated Frames
//!
//! The classic C trick for cooperative tasks is `setjmp`/`longjmp` with a
//! hand-built `jmp_buf` pointing at a fresh stack. On glibc that requires
//! defeating pointer mangling: the saved SP/PC are XOR-ed with a per-process
//! key (`PTR_MANGLE`), so task creation has to recover the key by capturing a
//! `jmp_buf` at a known call site and comparing the mangled value against the
//! statically known address. It works, but it is undefined behavior stacked on
//! an implementation detail, and it breaks whenever the libc, the compiler, or
//! the hardening scheme moves.
//!
//! This module replaces that trick with a first-class continuation. A task
//! that has never run gets a *fabricated* frame: a synthetic register spill
//! area at the top of its fresh stack whose saved return address is
//! [`launchpad`], a naked shim that moves the task's context pointer into the
//! argument register and jumps to its entry function. Resuming a fabricated
//! frame is indistinguishable from resuming one captured mid-execution, and
//! no libc internals are involved.
//!
//! ## Supported targets
//!
//! x86_64 (System V ABI) and aarch64 (AAPCS64). The frame layouts below are
//! mirrors of what the corresponding `switch` implementation pushes; the two
//! must be changed together.

/// A suspended task's stack pointer. The callee-saved register spill area
/// lives at and above this address, laid out exactly as [`switch`] expects.
#[repr(transparent)]
pub(crate) struct SavedContext(pub(crate) *mut u8);

/// Entry shim signature: receives the task's context pointer, never returns.
pub(crate) type RawEntry = extern "C" fn(*mut ()) -> !;

#[cfg(not(any(all(target_arch = "x86_64", not(windows)), target_arch = "aarch64")))]
compile_error!("perigee-rt supports x86_64 (System V) and aarch64 only");

// ---------------------------------------------------------------------------
// x86_64 (System V)
// ---------------------------------------------------------------------------

/// Switch stacks: spill callee-saved registers, store SP to `from`, load SP
/// from `to`, reload registers, return on the target's stack.
///
/// Callee-saved under System V: rbp, rbx, r12-r15. Everything else is
/// caller-saved and already preserved by the compiler around the call.
///
/// # Safety
///
/// `from` must be writable; `to` must point at a [`SavedContext`] produced by
/// a prior `switch` spill or by [`fabricate`]. Both tasks must run on the
/// same thread.
#[cfg(all(target_arch = "x86_64", not(windows)))]
#[unsafe(naked)]
pub(crate) unsafe extern "C" fn switch(_from: *mut SavedContext, _to: *const SavedContext) {
    core::arch::naked_asm!(
        "push rbp",
        "push rbx",
        "push r12",
        "push r13",
        "push r14",
        "push r15",
        "mov [rdi], rsp",
        "mov rsp, [rsi]",
        "pop r15",
        "pop r14",
        "pop r13",
        "pop r12",
        "pop rbx",
        "pop rbp",
        "ret",
    )
}

/// First-resume shim. The fabricated frame parks the context pointer in rbx
/// and the entry function in r12; `switch`'s final `ret` lands here with
/// rsp ≡ 8 (mod 16), the same alignment a real `call` would produce, so the
/// entry function sees an ordinary prologue environment.
#[cfg(all(target_arch = "x86_64", not(windows)))]
#[unsafe(naked)]
unsafe extern "C" fn launchpad() -> ! {
    core::arch::naked_asm!(
        "mov rdi, rbx",
        "jmp r12",
    )
}

/// Lay out a synthetic spill frame on a fresh stack so that the first
/// `switch` into it enters `entry(ctx)` via [`launchpad`].
///
/// Frame, ascending from the returned SP: r15 r14 r13 r12 rbx rbp, then the
/// return address slot holding [`launchpad`]. The return-address slot sits at
/// a 16-byte boundary so the post-`ret` stack mimics a `call`.
///
/// # Safety
///
/// `stack` must stay allocated and unmoved for as long as the task can run.
#[cfg(all(target_arch = "x86_64", not(windows)))]
pub(crate) unsafe fn fabricate(stack: &mut [u8], entry: RawEntry, ctx: *mut ()) -> SavedContext {
    let top = (stack.as_mut_ptr() as usize + stack.len()) & !15;
    let ret_slot = (top - 16) as *mut u64;
    let lp: unsafe extern "C" fn() -> ! = launchpad;
    // Safety: all writes land inside `stack`, which the caller guarantees is
    // large enough (enforced by the spawn-time minimum stack size).
    unsafe {
        ret_slot.write(lp as usize as u64);
        let spill = ret_slot.sub(6);
        spill.add(0).write(0); // r15
        spill.add(1).write(0); // r14
        spill.add(2).write(0); // r13
        spill.add(3).write(entry as usize as u64); // r12: entry function
        spill.add(4).write(ctx as usize as u64); // rbx: task context
        spill.add(5).write(0); // rbp
        SavedContext(spill as *mut u8)
    }
}

// ---------------------------------------------------------------------------
// aarch64 (AAPCS64)
// ---------------------------------------------------------------------------

/// Switch stacks on aarch64. Callee-saved: x19-x28, fp (x29), lr (x30) and
/// the low halves of v8-v15 (d8-d15). `ret` branches to the reloaded x30.
///
/// # Safety
///
/// Same contract as the x86_64 variant.
#[cfg(target_arch = "aarch64")]
#[unsafe(naked)]
pub(crate) unsafe extern "C" fn switch(_from: *mut SavedContext, _to: *const SavedContext) {
    core::arch::naked_asm!(
        "sub sp, sp, #0xa0",
        "stp x19, x20, [sp, #0x00]",
        "stp x21, x22, [sp, #0x10]",
        "stp x23, x24, [sp, #0x20]",
        "stp x25, x26, [sp, #0x30]",
        "stp x27, x28, [sp, #0x40]",
        "stp x29, x30, [sp, #0x50]",
        "stp d8, d9, [sp, #0x60]",
        "stp d10, d11, [sp, #0x70]",
        "stp d12, d13, [sp, #0x80]",
        "stp d14, d15, [sp, #0x90]",
        "mov x9, sp",
        "str x9, [x0]",
        "ldr x9, [x1]",
        "mov sp, x9",
        "ldp x19, x20, [sp, #0x00]",
        "ldp x21, x22, [sp, #0x10]",
        "ldp x23, x24, [sp, #0x20]",
        "ldp x25, x26, [sp, #0x30]",
        "ldp x27, x28, [sp, #0x40]",
        "ldp x29, x30, [sp, #0x50]",
        "ldp d8, d9, [sp, #0x60]",
        "ldp d10, d11, [sp, #0x70]",
        "ldp d12, d13, [sp, #0x80]",
        "ldp d14, d15, [sp, #0x90]",
        "add sp, sp, #0xa0",
        "ret",
    )
}

/// First-resume shim: context pointer parked in x19, entry function in x20.
#[cfg(target_arch = "aarch64")]
#[unsafe(naked)]
unsafe extern "C" fn launchpad() -> ! {
    core::arch::naked_asm!(
        "mov x0, x19",
        "br x20",
    )
}

/// aarch64 counterpart of the x86_64 `fabricate`: a 0xa0-byte spill area at
/// the (16-aligned) stack top, x19 = ctx, x20 = entry, x30 = [`launchpad`],
/// everything else zero.
///
/// # Safety
///
/// `stack` must stay allocated and unmoved for as long as the task can run.
#[cfg(target_arch = "aarch64")]
pub(crate) unsafe fn fabricate(stack: &mut [u8], entry: RawEntry, ctx: *mut ()) -> SavedContext {
    let top = (stack.as_mut_ptr() as usize + stack.len()) & !15;
    let spill = (top - 0xa0) as *mut u64;
    let lp: unsafe extern "C" fn() -> ! = launchpad;
    // Safety: all writes land inside `stack`, which the caller guarantees is
    // large enough (enforced by the spawn-time minimum stack size).
    unsafe {
        for slot in 0..20 {
            spill.add(slot).write(0);
        }
        spill.add(0).write(ctx as usize as u64); // x19: task context
        spill.add(1).write(entry as usize as u64); // x20: entry function
        spill.add(11).write(lp as usize as u64); // x30: return into launchpad
        SavedContext(spill as *mut u8)
    }
}
